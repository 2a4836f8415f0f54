//! Bridge self-description parsing.
//!
//! Each discovery candidate serves a `description.xml`. The only pieces the
//! core needs are the vendor marker, which separates bridges from every other
//! SSDP device on the network, and the serial number used as the bridge's
//! stable mac identifier.

const VENDOR_MARKER: &str = "<modelName>Philips hue bridge";
const SERIAL_OPEN: &str = "<serialNumber>";
const SERIAL_CLOSE: &str = "</serialNumber>";

/// Extract the mac identifier from a raw description document.
///
/// Returns `None` for anything that does not look like a Hue bridge
/// description; discovery treats that as "drop this candidate".
pub fn parse_description(text: &str) -> Option<String> {
    if !text.contains(VENDOR_MARKER) {
        return None;
    }
    let start = text.find(SERIAL_OPEN)? + SERIAL_OPEN.len();
    let end = start + text[start..].find(SERIAL_CLOSE)?;
    let serial = text[start..end].trim();
    if serial.is_empty() {
        return None;
    }
    Some(serial.to_string())
}

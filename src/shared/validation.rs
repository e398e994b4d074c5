use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating theme color fields (#rrggbb, lowercase or uppercase hex)
    /// - Valid: "#4f46e5", "#FFFFFF", "#000000"
    /// - Invalid: "4f46e5", "#fff", "#12345g", "rgb(0,0,0)"
    pub static ref HEX_COLOR_REGEX: Regex = Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap();

    /// Regex for Drive file ids as they appear in public URLs.
    /// - Valid: "1AbC_dEf-123", "xK9"
    /// - Invalid: "", "abc/def", "id with spaces"
    pub static ref DRIVE_FILE_ID_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

/// WHOA-MEGA-SUPER-SECURE AUTHENTICATION!
///
/// Lowercase hex MD5 of `{path}\r\n{api_key}\r\n{timestamp}`, where every `\r\n` is the four
/// literal characters and not a line break. FoxESS Cloud rejects anything else.
pub fn sign(api_key: &str, path: &str, timestamp_millis: i64) -> String {
    let digest = md5::compute(format!(r"{path}\r\n{api_key}\r\n{timestamp_millis}").as_bytes());
    format!("{digest:x}")
}

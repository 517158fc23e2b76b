const WHATSAPP_SHARE_URL: &str = "https://wa.me/?text=";

/// Escapes `urlencoding` emits where `encodeURIComponent` leaves the character as is.
const UNRESERVED_MARKS: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// WhatsApp deep link carrying `text` as a percent-encoded query parameter.
pub fn share_link(text: &str) -> String {
    let mut encoded = urlencoding::encode(text).into_owned();
    for (escaped, mark) in UNRESERVED_MARKS {
        encoded = encoded.replace(escaped, mark);
    }
    format!("{WHATSAPP_SHARE_URL}{encoded}")
}

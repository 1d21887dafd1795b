//! SMS-to-email gateway domains for US carriers.

use crate::common::CheckError;

/// Carrier key (lowercase) to gateway domain
pub const CARRIER_DOMAINS: [(&str, &str); 9] = [
    ("att", "txt.att.net"),
    ("verizon", "vtext.com"),
    ("tmobile", "tmomail.net"),
    ("sprint", "messaging.sprintpcs.com"),
    ("boost", "sms.myboostmobile.com"),
    ("cricket", "sms.cricketwireless.net"),
    ("metropcs", "mymetropcs.com"),
    ("uscellular", "email.uscc.net"),
    ("virgin", "vmobl.com"),
];

/// Gateway domain for a carrier, case-insensitive
pub fn gateway_domain(carrier: &str) -> Option<&'static str> {
    let carrier = carrier.trim().to_lowercase();
    CARRIER_DOMAINS
        .iter()
        .find(|(key, _)| *key == carrier)
        .map(|(_, domain)| *domain)
}

/// Email address that delivers an SMS to `phone_number` on `carrier`.
///
/// Gateways expect the bare 10-digit number, so punctuation and a leading
/// US country code are dropped.
pub fn sms_gateway_address(phone_number: &str, carrier: &str) -> Result<String, CheckError> {
    let domain =
        gateway_domain(carrier).ok_or_else(|| CheckError::UnknownCarrier(carrier.to_string()))?;

    let digits: String = phone_number.chars().filter(char::is_ascii_digit).collect();
    let local = match digits.strip_prefix('1') {
        Some(rest) if digits.len() == 11 => rest.to_string(),
        _ => digits,
    };

    if local.is_empty() {
        return Err(CheckError::Delivery(format!(
            "phone number {:?} has no digits",
            phone_number
        )));
    }

    Ok(format!("{}@{}", local, domain))
}

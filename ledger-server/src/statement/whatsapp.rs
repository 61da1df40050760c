//! WhatsApp statement text
//!
//! Builds the account-summary message and a `wa.me` link that opens the
//! customer's chat with the text prefilled. Actual delivery stays with the
//! operator; there is no WhatsApp Business API integration.

use urlencoding::encode;

use super::StatementData;
use crate::utils::time::format_date;

/// Render the statement as a WhatsApp message
pub fn build_message(data: &StatementData) -> String {
    let period = format!("{} - {}", format_date(data.from), format_date(data.to));

    format!(
        "\
🏪 *{business} - Account Statement*
📅 {period}

👤 *Customer:* {name}
🔢 *Serial Number:* {serial}
📱 *Mobile:* {mobile}

💰 *Account Summary:*
• Total Purchases: ₹{total}
• Amount Paid: ₹{advance}
• {closing}: ₹{outstanding}

Thank you for your business! 🙏",
        business = data.business_name,
        period = period,
        name = data.customer.name,
        serial = data.customer.serial_number,
        mobile = data.customer.mobile,
        total = data.totals.total_amount,
        advance = data.totals.total_advance,
        closing = data.totals.closing_label(),
        outstanding = data.totals.outstanding.abs(),
    )
}

/// `https://wa.me/<digits>?text=<urlencoded message>`
pub fn build_link(mobile: &str, message: &str) -> String {
    let digits: String = mobile.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("https://wa.me/{}?text={}", digits, encode(message))
}

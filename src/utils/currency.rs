/// 金额千位分组并追加货币符号，例如 10000 -> "10.000₫"
pub fn format_currency(value: u64, separator: &str, symbol: &str) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(ch);
    }

    format!("{grouped}{symbol}")
}

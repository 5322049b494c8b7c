/// Shannons per CKB.
pub const CKB_DECIMALS: u32 = 8;

const DEFAULT_MAX_DISPLAY_DECIMALS: usize = 4;

#[derive(Clone, Debug)]
pub struct HumanizeOptions<'a> {
    pub decimals: u32,
    pub max_display_decimals: usize,
    pub symbol: Option<&'a str>,
}

impl<'a> HumanizeOptions<'a> {
    pub fn new(decimals: u32) -> Self {
        HumanizeOptions {
            decimals,
            max_display_decimals: DEFAULT_MAX_DISPLAY_DECIMALS,
            symbol: None,
        }
    }

    pub fn max_display_decimals(mut self, max_display_decimals: usize) -> Self {
        self.max_display_decimals = max_display_decimals;
        self
    }

    pub fn symbol(mut self, symbol: &'a str) -> Self {
        self.symbol = Some(symbol);
        self
    }
}

/// Render a raw integer amount for people: thousands separators on the integer
/// part and a fractional part truncated (never rounded) to
/// `max_display_decimals` digits.
pub fn humanize(amount: u128, options: &HumanizeOptions) -> String {
    let decimals = options.decimals as usize;
    let (int_part, dec_part) = match 10u128.checked_pow(options.decimals) {
        Some(base) => (amount / base, amount % base),
        None => (0, amount),
    };

    let int_digits = int_part.to_string();
    let mut display_int = String::with_capacity(int_digits.len() + int_digits.len() / 3);
    for (i, c) in int_digits.chars().enumerate() {
        if i > 0 && (int_digits.len() - i) % 3 == 0 {
            display_int.push(',');
        }
        display_int.push(c);
    }

    let dec_digits = format!("{:0>width$}", dec_part, width = decimals);
    let shown = dec_digits
        .chars()
        .take(options.max_display_decimals)
        .collect::<String>();
    let shown = shown.trim_end_matches('0');

    let mut result = display_int;
    if !shown.is_empty() {
        result.push('.');
        result.push_str(shown);
    }
    if let Some(symbol) = options.symbol {
        result.push(' ');
        result.push_str(symbol);
    }
    result
}

/// Shortcut for capacities, which always carry 8 decimals.
pub fn humanize_ckb(shannons: u64) -> String {
    humanize(shannons as u128, &HumanizeOptions::new(CKB_DECIMALS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humanize() {
        let ckb = HumanizeOptions::new(8);
        assert_eq!(humanize(12300000000, &ckb), "123");
        assert_eq!(humanize(12300000001, &ckb), "123");
        assert_eq!(
            humanize(12300000001, &ckb.clone().max_display_decimals(8)),
            "123.00000001"
        );
        assert_eq!(
            humanize(12300000001, &ckb.clone().max_display_decimals(7)),
            "123"
        );
        assert_eq!(humanize(12300000001, &ckb.clone().symbol("CKB")), "123 CKB");

        assert_eq!(humanize(12300000, &ckb.clone().symbol("CKB")), "0.123 CKB");
        assert_eq!(
            humanize(123400000001, &ckb.clone().symbol("CKB")),
            "1,234 CKB"
        );
        assert_eq!(
            humanize(
                123400000001,
                &ckb.clone().symbol("CKB").max_display_decimals(8)
            ),
            "1,234.00000001 CKB"
        );
        assert_eq!(
            humanize(123443210001, &ckb.symbol("CKB")),
            "1,234.4321 CKB"
        );
    }

    #[test]
    fn test_humanize_zero_decimals() {
        assert_eq!(humanize(1234567, &HumanizeOptions::new(0)), "1,234,567");
        assert_eq!(humanize_ckb(0), "0");
        assert_eq!(humanize_ckb(6_100_000_000), "61");
    }
}

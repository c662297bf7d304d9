use super::PowerPlant;

/// One tooltip line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverLine {
    pub text: String,
    pub bold: bool,
}

impl HoverLine {
    fn plain(text: String) -> Self {
        Self { text, bold: false }
    }
}

/// Rich tooltip text for a single plant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverText {
    pub lines: Vec<HoverLine>,
}

impl HoverText {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Width of the longest line in characters
    pub fn width(&self) -> usize {
        self.lines.iter().map(|l| l.text.chars().count()).max().unwrap_or(0)
    }

    /// HTML rendition: bold via `<b>`, lines joined by `<br>`
    pub fn to_markup(&self) -> String {
        self.lines
            .iter()
            .map(|line| {
                if line.bold {
                    format!("<b>{}</b>", line.text)
                } else {
                    line.text.clone()
                }
            })
            .collect::<Vec<_>>()
            .join("<br>")
    }
}

/// Build the tooltip for a plant. The first four lines are always present;
/// other fuels, commissioning year and owner follow only when known.
pub fn build_hover_text(plant: &PowerPlant) -> HoverText {
    let capacity = match plant.capacity_mw {
        Some(mw) => format!("Capacity: {} MW", format_thousands(mw)),
        None => "Capacity: N/A".to_string(),
    };

    let mut lines = vec![
        HoverLine {
            text: plant.name.clone(),
            bold: true,
        },
        HoverLine::plain(format!("Country: {}", or_na(&plant.country_long))),
        HoverLine::plain(capacity),
        HoverLine::plain(format!("Primary fuel: {}", or_na(&plant.primary_fuel))),
    ];

    if let Some(other) = &plant.other_fuels {
        lines.push(HoverLine::plain(format!("Other fuels: {other}")));
    }
    if let Some(year) = plant.commissioning_year {
        lines.push(HoverLine::plain(format!("Commissioned: {year}")));
    }
    if let Some(owner) = &plant.owner {
        lines.push(HoverLine::plain(format!("Owner: {owner}")));
    }

    HoverText { lines }
}

fn or_na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}

/// Format a number with comma thousands separators. Whole numbers print
/// without a fractional part: 1500.0 -> "1,500", 1234.5 -> "1,234.5".
pub fn format_thousands(value: f64) -> String {
    let raw = if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    };

    let (sign, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plants::tests::plant;

    #[test]
    fn test_minimal_plant_has_four_lines() {
        let mut p = plant("Plant A", Some("USA"), Some("Gas"));
        p.capacity_mw = Some(1500.0);

        let hover = build_hover_text(&p);
        let texts: Vec<&str> = hover.lines.iter().map(|l| l.text.as_str()).collect();

        assert_eq!(
            texts,
            vec!["Plant A", "Country: USA", "Capacity: 1,500 MW", "Primary fuel: Gas"]
        );
        assert!(hover.lines[0].bold);
        assert!(hover.lines[1..].iter().all(|l| !l.bold));
    }

    #[test]
    fn test_optional_lines_in_order() {
        let mut p = plant("Big Dam", Some("Brazil"), Some("Hydro"));
        p.other_fuels = Some("Oil, Gas".to_string());
        p.commissioning_year = Some(1984);
        p.owner = Some("Itaipu Binacional".to_string());

        let hover = build_hover_text(&p);

        assert_eq!(hover.len(), 7);
        assert_eq!(hover.lines[2].text, "Capacity: N/A");
        assert_eq!(hover.lines[4].text, "Other fuels: Oil, Gas");
        assert_eq!(hover.lines[5].text, "Commissioned: 1984");
        assert_eq!(hover.lines[6].text, "Owner: Itaipu Binacional");
    }

    #[test]
    fn test_markup_uses_bold_and_breaks() {
        let mut p = plant("Plant A", Some("USA"), Some("Gas"));
        p.capacity_mw = Some(1500.0);

        assert_eq!(
            build_hover_text(&p).to_markup(),
            "<b>Plant A</b><br>Country: USA<br>Capacity: 1,500 MW<br>Primary fuel: Gas"
        );
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(1000.0), "1,000");
        assert_eq!(format_thousands(22500.0), "22,500");
        assert_eq!(format_thousands(1234567.0), "1,234,567");
        assert_eq!(format_thousands(1234.5), "1,234.5");
        assert_eq!(format_thousands(2.25), "2.25");
        assert_eq!(format_thousands(-4321.0), "-4,321");
    }
}

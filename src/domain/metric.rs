// Metric domain model
use serde::Deserialize;

/// One tracked quantity and the page elements it drives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MetricConfig {
    pub id: String,
    pub value_element_id: String,
    pub chart_element_id: String,
    /// Sheet name on the remote API
    pub source_name: String,
    #[serde(default)]
    pub unit: String,
}

impl MetricConfig {
    pub fn new(id: &str, value_element_id: &str, chart_element_id: &str, source_name: &str, unit: &str) -> Self {
        Self {
            id: id.to_string(),
            value_element_id: value_element_id.to_string(),
            chart_element_id: chart_element_id.to_string(),
            source_name: source_name.to_string(),
            unit: unit.to_string(),
        }
    }

    /// Text shown in the value element for the latest reading
    pub fn format_reading(&self, value: f64) -> String {
        format!("{} {}", format_one_decimal(value), self.unit)
    }
}

/// One-decimal rendering of `value`. Exact ties round away from zero and
/// the decision is made on the exact binary value, so 21.25 gives "21.3"
/// while 0.15 (stored just below the tie) gives "0.1". Negative zero
/// prints as "0.0".
pub fn format_one_decimal(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    // 60 places are enough to expose every f64 that sits near a tie at the
    // second decimal
    let exact = format!("{:.60}", value.abs());
    let Some((int_part, frac)) = exact.split_once('.') else {
        return exact;
    };
    let frac = frac.as_bytes();

    let mut digits: Vec<u8> = int_part.bytes().chain(std::iter::once(frac[0])).collect();
    if frac[1] >= b'5' {
        let mut i = digits.len();
        loop {
            if i == 0 {
                digits.insert(0, b'1');
                break;
            }
            i -= 1;
            if digits[i] == b'9' {
                digits[i] = b'0';
            } else {
                digits[i] += 1;
                break;
            }
        }
    }

    let split = digits.len() - 1;
    let mut out = String::with_capacity(digits.len() + 2);
    if value < 0.0 {
        out.push('-');
    }
    out.push_str(&String::from_utf8_lossy(&digits[..split]));
    out.push('.');
    out.push(digits[split] as char);
    out
}

/// Built-in metric table, in refresh order
pub fn default_metrics() -> Vec<MetricConfig> {
    vec![
        MetricConfig::new("temp", "temp-value", "temp-chart", "TEMPERATURA", "°C"),
        MetricConfig::new("humAir", "hum-air-value", "hum-air-chart", "UMIDADE_AR", "%"),
        MetricConfig::new("humSoil", "hum-soil-value", "hum-soil-chart", "UMIDADE_SOLO", ""),
        MetricConfig::new(
            "lumInt",
            "lum-int-value",
            "lum-int-chart",
            "LUMINOSIDADE_INTERNA",
            "",
        ),
    ]
}

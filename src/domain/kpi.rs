// Headline KPI domain models
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub total_trips: u64,
    pub avg_fare: f64,
    pub avg_distance: f64,
}

/// A formatted KPI card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileData {
    pub id: String,
    pub title: String,
    pub value: f64,
    pub display: String,
}

impl TileData {
    pub fn new(id: &str, title: &str, value: f64, display: String) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            value,
            display,
        }
    }
}

impl KpiSummary {
    pub fn new(total_trips: u64, avg_fare: f64, avg_distance: f64) -> Self {
        Self {
            total_trips,
            avg_fare,
            avg_distance,
        }
    }

    pub fn tiles(&self) -> Vec<TileData> {
        vec![
            TileData::new(
                "total_trips",
                "Total Trips",
                self.total_trips as f64,
                group_thousands(self.total_trips),
            ),
            TileData::new("avg_fare", "Avg Fare", self.avg_fare, format!("${:.2}", self.avg_fare)),
            TileData::new(
                "avg_distance",
                "Avg Distance",
                self.avg_distance,
                format!("{:.2} miles", self.avg_distance),
            ),
        ]
    }
}

/// 1234567 -> "1,234,567"
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(3_066_766), "3,066,766");
    }

    #[test]
    fn test_tiles() {
        let tiles = KpiSummary::new(12345, 27.456, 3.1).tiles();
        let displays: Vec<&str> = tiles.iter().map(|t| t.display.as_str()).collect();
        assert_eq!(displays, vec!["12,345", "$27.46", "3.10 miles"]);
        assert_eq!(tiles[0].title, "Total Trips");
    }
}

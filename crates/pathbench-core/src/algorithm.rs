use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AlgorithmFamily {
    #[serde(rename = "astar")]
    AStar,
    #[serde(rename = "pra")]
    PraStar,
}

impl AlgorithmFamily {
    pub const ALL: [AlgorithmFamily; 2] = [AlgorithmFamily::AStar, AlgorithmFamily::PraStar];

    pub fn as_str(self) -> &'static str {
        match self {
            AlgorithmFamily::AStar => "astar",
            AlgorithmFamily::PraStar => "pra",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "astar" => Some(AlgorithmFamily::AStar),
            "pra" => Some(AlgorithmFamily::PraStar),
            _ => None,
        }
    }

    pub fn is_baseline(self) -> bool {
        matches!(self, AlgorithmFamily::AStar)
    }
}

impl fmt::Display for AlgorithmFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AlgorithmConfig {
    AStar,
    PraStar { k: u32 },
}

impl AlgorithmConfig {
    pub fn matrix(k_values: &[u32]) -> Vec<AlgorithmConfig> {
        let mut configs = Vec::with_capacity(k_values.len() + 1);
        configs.push(AlgorithmConfig::AStar);
        configs.extend(k_values.iter().map(|&k| AlgorithmConfig::PraStar { k }));
        configs
    }

    pub fn from_parts(family: AlgorithmFamily, k: u32) -> Self {
        match family {
            AlgorithmFamily::AStar => AlgorithmConfig::AStar,
            AlgorithmFamily::PraStar => AlgorithmConfig::PraStar { k },
        }
    }

    pub fn family(&self) -> AlgorithmFamily {
        match self {
            AlgorithmConfig::AStar => AlgorithmFamily::AStar,
            AlgorithmConfig::PraStar { .. } => AlgorithmFamily::PraStar,
        }
    }

    pub fn k(&self) -> u32 {
        match self {
            AlgorithmConfig::AStar => 0,
            AlgorithmConfig::PraStar { k } => *k,
        }
    }

    pub fn is_baseline(&self) -> bool {
        self.family().is_baseline()
    }

    pub fn label(&self) -> String {
        match self {
            AlgorithmConfig::AStar => "A*".to_string(),
            AlgorithmConfig::PraStar { k: 0 } => "PRA*(inf)".to_string(),
            AlgorithmConfig::PraStar { k } => format!("PRA*({})", k),
        }
    }
}

impl fmt::Display for AlgorithmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/k={}", self.family(), self.k())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_puts_baseline_first_exactly_once() {
        let configs = AlgorithmConfig::matrix(&[0, 2, 4, 8, 16]);
        assert_eq!(configs.len(), 6);
        assert_eq!(configs[0], AlgorithmConfig::AStar);
        assert_eq!(configs.iter().filter(|c| c.is_baseline()).count(), 1);
        assert_eq!(configs[5], AlgorithmConfig::PraStar { k: 16 });
    }

    #[test]
    fn matrix_without_k_values_is_baseline_only() {
        assert_eq!(AlgorithmConfig::matrix(&[]), vec![AlgorithmConfig::AStar]);
    }

    #[test]
    fn labels_render_unbounded_k_as_inf() {
        assert_eq!(AlgorithmConfig::AStar.label(), "A*");
        assert_eq!(AlgorithmConfig::PraStar { k: 0 }.label(), "PRA*(inf)");
        assert_eq!(AlgorithmConfig::PraStar { k: 8 }.label(), "PRA*(8)");
    }

    #[test]
    fn family_names_round_trip_through_parse() {
        for family in AlgorithmFamily::ALL {
            assert_eq!(AlgorithmFamily::parse(family.as_str()), Some(family));
        }
        assert_eq!(AlgorithmFamily::parse("dijkstra"), None);
    }

    #[test]
    fn from_parts_drops_k_for_baseline() {
        assert_eq!(
            AlgorithmConfig::from_parts(AlgorithmFamily::AStar, 7),
            AlgorithmConfig::AStar
        );
        assert_eq!(
            AlgorithmConfig::from_parts(AlgorithmFamily::PraStar, 7),
            AlgorithmConfig::PraStar { k: 7 }
        );
    }
}

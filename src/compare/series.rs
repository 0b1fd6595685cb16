//! Year-by-year comparison of two competing cost series

use serde::{Deserialize, Serialize};

/// Which of the two scenarios costs less
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    A,
    B,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparativeYearRow {
    pub year: u32,
    pub cost_a: f64,
    pub cost_b: f64,
    pub cumulative_a: f64,
    pub cumulative_b: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparativeResult {
    pub total_cost_a: f64,
    pub total_cost_b: f64,
    /// `total_cost_a - total_cost_b`
    pub net_difference: f64,
    /// A when it is strictly cheaper, otherwise B
    pub recommendation: Recommendation,
    pub yearly_breakdown: Vec<ComparativeYearRow>,
}

impl ComparativeResult {
    /// The same comparison with the scenarios exchanged
    pub fn swapped(&self) -> Self {
        let costs_a: Vec<f64> = self.yearly_breakdown.iter().map(|r| r.cost_b).collect();
        let costs_b: Vec<f64> = self.yearly_breakdown.iter().map(|r| r.cost_a).collect();
        compare_series(&costs_a, &costs_b)
    }

    /// First year in which A's running total drops to or below B's and stays there
    pub fn break_even_year(&self) -> Option<u32> {
        let mut candidate = None;
        for row in &self.yearly_breakdown {
            if row.cumulative_a <= row.cumulative_b {
                if candidate.is_none() {
                    candidate = Some(row.year);
                }
            } else {
                candidate = None;
            }
        }
        candidate
    }
}

/// Compare two yearly cost series over a shared horizon.
///
/// The horizon is the longer of the two; a shorter series costs nothing in
/// the years it does not cover.
pub fn compare_series(costs_a: &[f64], costs_b: &[f64]) -> ComparativeResult {
    let horizon = costs_a.len().max(costs_b.len());
    let mut cumulative_a = 0.0;
    let mut cumulative_b = 0.0;

    let yearly_breakdown: Vec<ComparativeYearRow> = (0..horizon)
        .map(|i| {
            let cost_a = costs_a.get(i).copied().unwrap_or(0.0);
            let cost_b = costs_b.get(i).copied().unwrap_or(0.0);
            cumulative_a += cost_a;
            cumulative_b += cost_b;
            ComparativeYearRow {
                year: i as u32 + 1,
                cost_a,
                cost_b,
                cumulative_a,
                cumulative_b,
            }
        })
        .collect();

    let net_difference = cumulative_a - cumulative_b;
    ComparativeResult {
        total_cost_a: cumulative_a,
        total_cost_b: cumulative_b,
        net_difference,
        recommendation: if net_difference < 0.0 {
            Recommendation::A
        } else {
            Recommendation::B
        },
        yearly_breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cumulative_totals() {
        let result = compare_series(&[100.0, 100.0, 100.0], &[50.0, 120.0, 150.0]);
        assert_eq!(result.yearly_breakdown.len(), 3);
        assert_eq!(result.yearly_breakdown[1].cumulative_a, 200.0);
        assert_eq!(result.yearly_breakdown[1].cumulative_b, 170.0);
        assert_eq!(result.total_cost_a, 300.0);
        assert_eq!(result.total_cost_b, 320.0);
        assert_eq!(result.net_difference, -20.0);
        assert_eq!(result.recommendation, Recommendation::A);
    }

    #[test]
    fn test_swap_flips_recommendation_and_negates_difference() {
        let result = compare_series(&[900.0, 400.0, 100.0], &[500.0, 500.0, 500.0]);
        let swapped = result.swapped();
        assert_eq!(swapped.net_difference, -result.net_difference);
        assert_ne!(swapped.recommendation, result.recommendation);
    }

    #[test]
    fn test_tie_recommends_b() {
        let result = compare_series(&[100.0], &[100.0]);
        assert_eq!(result.net_difference, 0.0);
        assert_eq!(result.recommendation, Recommendation::B);
    }

    #[test]
    fn test_unequal_lengths_share_horizon() {
        let result = compare_series(&[100.0, 100.0], &[60.0, 60.0, 60.0, 60.0]);
        assert_eq!(result.yearly_breakdown.len(), 4);
        assert_eq!(result.yearly_breakdown[3].cost_a, 0.0);
        assert_eq!(result.total_cost_a, 200.0);
        assert_eq!(result.total_cost_b, 240.0);
    }

    #[test]
    fn test_break_even_year() {
        let result = compare_series(&[1_000.0, 100.0, 100.0, 100.0], &[400.0, 400.0, 400.0, 400.0]);
        // cumulative A: 1000, 1100, 1200, 1300; B: 400, 800, 1200, 1600
        assert_eq!(result.break_even_year(), Some(3));
        assert_eq!(compare_series(&[500.0], &[100.0]).break_even_year(), None);
    }
}

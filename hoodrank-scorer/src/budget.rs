//! Budget expressions and the budget-fit price bands.
//!
//! Users describe a budget as free text such as `"750k"`, `"€2,500"` or
//! `"745000-1205000"`. [`parse_price_range`] turns that into whole-unit
//! bounds with exact integer arithmetic; [`Budget`] keeps the upper bound and
//! the tenure mode it applies to.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Whole-unit bounds parsed from a budget expression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Lower bound, if any value parsed.
    pub low: Option<u64>,
    /// Upper bound, if any value parsed.
    pub high: Option<u64>,
}

impl PriceRange {
    /// Effective budget: the upper bound, falling back to the lower one.
    #[must_use]
    pub const fn upper_bound(self) -> Option<u64> {
        match self.high {
            Some(high) => Some(high),
            None => self.low,
        }
    }

    const fn single(value: u64) -> Self {
        Self {
            low: Some(value),
            high: Some(value),
        }
    }
}

const RANGE_SEPARATORS: [&str; 4] = [" to ", "\u{2013}", "\u{2014}", "-"];

/// Parse a single value or a `low-high` range.
///
/// Ranges may use `-`, an en or em dash, or ` to `. Each side may be compact
/// (`750k`, `1.2M`, `1,2M`) or decorated with currency symbols and thousands
/// separators (`€2,500`, `2 500 EUR`). Reversed ranges are normalised and an
/// unparseable expression yields empty bounds.
///
/// # Examples
/// ```
/// use hoodrank_scorer::{parse_price_range, PriceRange};
///
/// let range = parse_price_range("745000-1205000");
/// assert_eq!(range, PriceRange { low: Some(745_000), high: Some(1_205_000) });
/// assert_eq!(parse_price_range("1,2M").upper_bound(), Some(1_200_000));
/// assert_eq!(parse_price_range("€2,500").upper_bound(), Some(2_500));
/// assert_eq!(parse_price_range("ask me later"), PriceRange::default());
/// ```
#[must_use]
pub fn parse_price_range(expression: &str) -> PriceRange {
    let lowered = expression.trim().to_lowercase();
    let split = RANGE_SEPARATORS
        .iter()
        .find_map(|separator| lowered.split_once(separator));
    let Some((left, right)) = split else {
        return parse_amount(&lowered).map_or_else(PriceRange::default, PriceRange::single);
    };
    match (parse_amount(left), parse_amount(right)) {
        (Some(low), Some(high)) => PriceRange {
            low: Some(low.min(high)),
            high: Some(low.max(high)),
        },
        (Some(value), None) | (None, Some(value)) => PriceRange::single(value),
        (None, None) => PriceRange::default(),
    }
}

fn parse_amount(text: &str) -> Option<u64> {
    let trimmed = text.trim();
    compact_amount(trimmed).or_else(|| digits_only(trimmed))
}

/// `<digits>[.,<digits>] <k|m>`, optionally preceded by a currency symbol.
fn compact_amount(text: &str) -> Option<u64> {
    let body = text
        .trim_start_matches(|c: char| !c.is_ascii_digit())
        .trim_end();
    [('k', 1_000), ('m', 1_000_000)]
        .into_iter()
        .find_map(|(suffix, multiplier)| body.strip_suffix(suffix).map(|rest| (rest, multiplier)))
        .and_then(|(rest, multiplier)| scaled(rest.trim_end(), multiplier))
}

fn scaled(number: &str, multiplier: u64) -> Option<u64> {
    let (whole, fraction) = match number.split_once(['.', ',']) {
        Some((whole, fraction)) => (whole, fraction),
        None => (number, ""),
    };
    if whole.is_empty() || !is_digits(whole) || !(fraction.is_empty() || is_digits(fraction)) {
        return None;
    }
    if number.ends_with(['.', ',']) {
        return None;
    }
    let whole_units = whole.parse::<u64>().ok()?.checked_mul(multiplier)?;
    if fraction.is_empty() {
        return Some(whole_units);
    }
    let digits = u32::try_from(fraction.len()).ok()?;
    let scale = 10_u64.checked_pow(digits)?;
    let fractional_units = fraction
        .parse::<u64>()
        .ok()?
        .checked_mul(multiplier)?
        .checked_div(scale)?;
    whole_units.checked_add(fractional_units)
}

fn digits_only(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

fn is_digits(text: &str) -> bool {
    text.chars().all(|c| c.is_ascii_digit())
}

/// Whether the user buys or rents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenureMode {
    /// Purchase budget in whole currency units.
    Buy,
    /// Monthly rent budget in whole currency units.
    Rent,
}

/// Effective budget for budget-fit scoring.
///
/// # Examples
/// ```
/// use hoodrank_scorer::{Budget, TenureMode};
///
/// let budget = Budget::from_answers(Some("745000-1205000"), Some("1800")).expect("budget");
/// assert_eq!(budget.mode, TenureMode::Buy);
/// assert_eq!(budget.amount, 1_205_000);
/// assert!(Budget::from_answers(None, Some("flexible")).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Tenure the amount applies to.
    pub mode: TenureMode,
    /// Upper bound of the parsed expression.
    pub amount: u64,
}

impl Budget {
    /// Build a budget from an expression; `None` when nothing usable parses.
    #[must_use]
    pub fn from_expression(mode: TenureMode, expression: &str) -> Option<Self> {
        let Some(amount) = parse_price_range(expression).upper_bound() else {
            log::warn!("could not parse budget expression '{expression}'; treating it as absent");
            return None;
        };
        if amount == 0 {
            return None;
        }
        Some(Self { mode, amount })
    }

    /// Prefer the purchase budget, falling back to rent.
    #[must_use]
    pub fn from_answers(buy: Option<&str>, rent: Option<&str>) -> Option<Self> {
        buy.and_then(|expression| Self::from_expression(TenureMode::Buy, expression))
            .or_else(|| rent.and_then(|expression| Self::from_expression(TenureMode::Rent, expression)))
    }
}

/// Budget thresholds for one tenure mode and area class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBand {
    /// Budget at or above which the fit is 3.
    pub fair: u64,
    /// Budget at or above which the fit is 4.
    pub comfortable: u64,
}

impl PriceBand {
    /// Base fit for `amount`: 4, 3 or 2.
    #[must_use]
    pub const fn fit(self, amount: u64) -> u8 {
        if amount >= self.comfortable {
            4
        } else if amount >= self.fair {
            3
        } else {
            2
        }
    }
}

/// Standard and premium bands for one tenure mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenureBands {
    /// Bands for ordinary areas.
    pub standard: PriceBand,
    /// Bands for areas carrying a premium tag.
    pub premium: PriceBand,
}

/// Price bands per tenure mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetTiers {
    /// Purchase bands.
    pub buy: TenureBands,
    /// Monthly rent bands.
    pub rent: TenureBands,
}

impl BudgetTiers {
    /// Base fit of `budget` for an area, before the cost-pressure penalty.
    #[must_use]
    pub const fn base_fit(&self, budget: Budget, premium: bool) -> u8 {
        let bands = match budget.mode {
            TenureMode::Buy => self.buy,
            TenureMode::Rent => self.rent,
        };
        let band = if premium { bands.premium } else { bands.standard };
        band.fit(budget.amount)
    }

    pub(crate) fn validate(self) -> Result<Self, ConfigError> {
        let bands = [
            self.buy.standard,
            self.buy.premium,
            self.rent.standard,
            self.rent.premium,
        ];
        if bands.iter().any(|band| band.fair > band.comfortable) {
            return Err(ConfigError::Unordered {
                field: "budget price band",
            });
        }
        Ok(self)
    }
}

impl Default for BudgetTiers {
    fn default() -> Self {
        Self {
            buy: TenureBands {
                standard: PriceBand {
                    fair: 450_000,
                    comfortable: 650_000,
                },
                premium: PriceBand {
                    fair: 650_000,
                    comfortable: 850_000,
                },
            },
            rent: TenureBands {
                standard: PriceBand {
                    fair: 1_500,
                    comfortable: 2_000,
                },
                premium: PriceBand {
                    fair: 2_200,
                    comfortable: 2_800,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("745000-1205000", Some(745_000), Some(1_205_000))]
    #[case("1205000 - 745000", Some(745_000), Some(1_205_000))]
    #[case("750k", Some(750_000), Some(750_000))]
    #[case("1.2M", Some(1_200_000), Some(1_200_000))]
    #[case("€650k to €1,2M", Some(650_000), Some(1_200_000))]
    #[case("2 500 EUR", Some(2_500), Some(2_500))]
    #[case("1500\u{2013}2000", Some(1_500), Some(2_000))]
    #[case("1.25k", Some(1_250), Some(1_250))]
    #[case("", None, None)]
    #[case("whatever fits", None, None)]
    fn price_ranges(#[case] expression: &str, #[case] low: Option<u64>, #[case] high: Option<u64>) {
        assert_eq!(parse_price_range(expression), PriceRange { low, high });
    }

    #[rstest]
    #[case(TenureMode::Buy, 449_999, false, 2)]
    #[case(TenureMode::Buy, 450_000, false, 3)]
    #[case(TenureMode::Buy, 700_000, false, 4)]
    #[case(TenureMode::Buy, 700_000, true, 3)]
    #[case(TenureMode::Buy, 850_000, true, 4)]
    #[case(TenureMode::Rent, 1_999, false, 3)]
    #[case(TenureMode::Rent, 2_000, false, 4)]
    #[case(TenureMode::Rent, 2_000, true, 2)]
    #[case(TenureMode::Rent, 2_800, true, 4)]
    fn base_fit_bands(
        #[case] mode: TenureMode,
        #[case] amount: u64,
        #[case] premium: bool,
        #[case] expected: u8,
    ) {
        let tiers = BudgetTiers::default();
        assert_eq!(tiers.base_fit(Budget { mode, amount }, premium), expected);
    }

    #[test]
    fn zero_budgets_are_absent() {
        assert!(Budget::from_expression(TenureMode::Rent, "0").is_none());
    }

    #[test]
    fn rent_is_used_without_a_purchase_budget() {
        let budget = Budget::from_answers(Some("n/a"), Some("€1,800/month"));
        assert_eq!(
            budget,
            Some(Budget {
                mode: TenureMode::Rent,
                amount: 1_800,
            })
        );
    }

    #[test]
    fn unordered_bands_are_rejected() {
        let mut tiers = BudgetTiers::default();
        tiers.rent.premium.fair = 5_000;
        assert!(tiers.validate().is_err());
    }
}

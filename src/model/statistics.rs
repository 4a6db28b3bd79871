use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;

/**
 * Number of species returned by the ranking queries.
 */
pub const TOP_SPECIES_LIMIT: i64 = 10;

/**
 * Size of the trailing window used for recent activity counts.
 */
pub const RECENT_ACTIVITY_DAYS: i64 = 30;

/**
 * Start of the recent activity window. Rows with `created_at` on or after this instant count as recent.
 *
 * # Arguments
 * `now`: The instant captured once for the whole request.
 */
pub fn recent_activity_since(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(RECENT_ACTIVITY_DAYS)
}

/**
 * Aggregates over the drums associated with one apiary.
 */
#[derive(Debug, Clone)]
pub struct ApiaryStatisticsType {
    pub apiary_id: i64,
    pub apiary_name: String,
    pub total_drums: i64,
    pub total_samples: i64,
    pub total_analyses: i64,
    pub total_species: i64,
    pub average_humidity: Option<Decimal>,
    pub average_color: Option<Decimal>,
}

/**
 * Grain totals of one species within a sample.
 */
#[derive(Debug, Clone)]
pub struct SpeciesBreakdownType {
    pub scientific_name: String,
    pub total_grains: i64,
    pub average_percentage: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct SampleStatisticsType {
    pub sample_id: i64,
    pub total_analyses: i64,
    pub species: Vec<SpeciesBreakdownType>,
}

/**
 * A species ranked by how many analyses found it.
 */
#[derive(Debug, Clone)]
pub struct TopSpeciesType {
    pub species_id: i64,
    pub scientific_name: String,
    pub total_analyses: i64,
    pub total_grains: i64,
}

#[derive(Debug, Clone, Default)]
pub struct EntityTotalsType {
    pub beekeepers: i64,
    pub analysts: i64,
    pub apiaries: i64,
    pub drums: i64,
    pub species: i64,
    pub samples: i64,
    pub pools: i64,
    pub palynological_analyses: i64,
    pub physicochemical_analyses: i64,
}

/**
 * Number of samples extracted in a month. `month` is the first day of that month.
 */
#[derive(Debug, Clone)]
pub struct MonthlyCountType {
    pub month: NaiveDate,
    pub total: i64,
}

#[derive(Debug, Clone)]
pub struct SpeciesAnalysisCountType {
    pub species_id: i64,
    pub scientific_name: String,
    pub total_analyses: i64,
    pub average_grains: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct ApiaryHumidityType {
    pub apiary_id: i64,
    pub apiary_name: String,
    pub average_humidity: Decimal,
}

#[derive(Debug, Clone)]
pub struct RecentActivityType {
    pub since: DateTime<Utc>,
    pub samples: i64,
    pub palynological_analyses: i64,
    pub physicochemical_analyses: i64,
}

/**
 * All blocks of the global dashboard, computed against the same `now`.
 */
#[derive(Debug, Clone)]
pub struct DashboardType {
    pub totals: EntityTotalsType,
    pub samples_by_month: Vec<MonthlyCountType>,
    pub species_by_analyses: Vec<SpeciesAnalysisCountType>,
    pub humidity_by_apiary: Vec<ApiaryHumidityType>,
    pub recent_activity: RecentActivityType,
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_recent_activity_since() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        assert_eq!(recent_activity_since(now), Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    }
}

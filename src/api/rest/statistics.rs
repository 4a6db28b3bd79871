use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::statistics::{
    ApiaryHumidityType, ApiaryStatisticsType, DashboardType, EntityTotalsType, MonthlyCountType, RecentActivityType, SampleStatisticsType, SpeciesAnalysisCountType, SpeciesBreakdownType,
    TopSpeciesType,
};

/***************** Report models *********************/

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiaryStatisticsResponse {
    pub apiary_id: i64,
    pub apiary_name: String,
    pub total_drums: i64,
    pub total_samples: i64,
    pub total_analyses: i64,
    pub total_species: i64,
    pub average_humidity: Option<Decimal>,
    pub average_color: Option<Decimal>,
}

impl From<ApiaryStatisticsType> for ApiaryStatisticsResponse {
    fn from(statistics: ApiaryStatisticsType) -> Self {
        ApiaryStatisticsResponse {
            apiary_id: statistics.apiary_id,
            apiary_name: statistics.apiary_name,
            total_drums: statistics.total_drums,
            total_samples: statistics.total_samples,
            total_analyses: statistics.total_analyses,
            total_species: statistics.total_species,
            average_humidity: statistics.average_humidity,
            average_color: statistics.average_color,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesBreakdownResponse {
    pub scientific_name: String,
    pub total_grains: i64,
    pub average_percentage: Option<Decimal>,
}

impl From<SpeciesBreakdownType> for SpeciesBreakdownResponse {
    fn from(breakdown: SpeciesBreakdownType) -> Self {
        SpeciesBreakdownResponse { scientific_name: breakdown.scientific_name, total_grains: breakdown.total_grains, average_percentage: breakdown.average_percentage }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleStatisticsResponse {
    pub sample_id: i64,
    pub total_analyses: i64,
    pub species: Vec<SpeciesBreakdownResponse>,
}

impl From<SampleStatisticsType> for SampleStatisticsResponse {
    fn from(statistics: SampleStatisticsType) -> Self {
        SampleStatisticsResponse {
            sample_id: statistics.sample_id,
            total_analyses: statistics.total_analyses,
            species: statistics.species.into_iter().map(SpeciesBreakdownResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSpeciesResponse {
    pub species_id: i64,
    pub scientific_name: String,
    pub total_analyses: i64,
    pub total_grains: i64,
}

impl From<TopSpeciesType> for TopSpeciesResponse {
    fn from(species: TopSpeciesType) -> Self {
        TopSpeciesResponse { species_id: species.species_id, scientific_name: species.scientific_name, total_analyses: species.total_analyses, total_grains: species.total_grains }
    }
}

/***************** Dashboard models *********************/

/**
 * Dashboard body. Keys follow the reporting contract consumed by the lab frontend, so they are
 * spelled out per field instead of using a rename rule.
 */
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub estadisticas_generales: TotalsResponse,
    pub muestras_por_mes: Vec<MonthlyCountResponse>,
    pub analisis_por_especie: Vec<SpeciesAnalysisCountResponse>,
    pub humedad_por_apiario: Vec<ApiaryHumidityResponse>,
    pub actividad_reciente: RecentActivityResponse,
}

impl From<DashboardType> for DashboardResponse {
    fn from(dashboard: DashboardType) -> Self {
        DashboardResponse {
            estadisticas_generales: TotalsResponse::from(dashboard.totals),
            muestras_por_mes: dashboard.samples_by_month.into_iter().map(MonthlyCountResponse::from).collect(),
            analisis_por_especie: dashboard.species_by_analyses.into_iter().map(SpeciesAnalysisCountResponse::from).collect(),
            humedad_por_apiario: dashboard.humidity_by_apiary.into_iter().map(ApiaryHumidityResponse::from).collect(),
            actividad_reciente: RecentActivityResponse::from(dashboard.recent_activity),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TotalsResponse {
    pub total_apicultores: i64,
    pub total_analistas: i64,
    pub total_apiarios: i64,
    pub total_tambores: i64,
    pub total_especies: i64,
    pub total_muestras: i64,
    pub total_pools: i64,
    pub total_analisis_palinologicos: i64,
    pub total_analisis_fisicoquimicos: i64,
}

impl From<EntityTotalsType> for TotalsResponse {
    fn from(totals: EntityTotalsType) -> Self {
        TotalsResponse {
            total_apicultores: totals.beekeepers,
            total_analistas: totals.analysts,
            total_apiarios: totals.apiaries,
            total_tambores: totals.drums,
            total_especies: totals.species,
            total_muestras: totals.samples,
            total_pools: totals.pools,
            total_analisis_palinologicos: totals.palynological_analyses,
            total_analisis_fisicoquimicos: totals.physicochemical_analyses,
        }
    }
}

/**
 * `mes` is rendered as `YYYY-MM`.
 */
#[derive(Debug, Serialize)]
pub struct MonthlyCountResponse {
    pub mes: String,
    pub total: i64,
}

impl From<MonthlyCountType> for MonthlyCountResponse {
    fn from(count: MonthlyCountType) -> Self {
        MonthlyCountResponse { mes: count.month.format("%Y-%m").to_string(), total: count.total }
    }
}

#[derive(Debug, Serialize)]
pub struct SpeciesAnalysisCountResponse {
    pub especie_id: i64,
    pub nombre_cientifico: String,
    pub total_analisis: i64,
    pub promedio_granos: Option<Decimal>,
}

impl From<SpeciesAnalysisCountType> for SpeciesAnalysisCountResponse {
    fn from(count: SpeciesAnalysisCountType) -> Self {
        SpeciesAnalysisCountResponse { especie_id: count.species_id, nombre_cientifico: count.scientific_name, total_analisis: count.total_analyses, promedio_granos: count.average_grains }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiaryHumidityResponse {
    pub apiario_id: i64,
    pub nombre: String,
    pub promedio_humedad: Decimal,
}

impl From<ApiaryHumidityType> for ApiaryHumidityResponse {
    fn from(humidity: ApiaryHumidityType) -> Self {
        ApiaryHumidityResponse { apiario_id: humidity.apiary_id, nombre: humidity.apiary_name, promedio_humedad: humidity.average_humidity }
    }
}

#[derive(Debug, Serialize)]
pub struct RecentActivityResponse {
    pub desde: DateTime<Utc>,
    pub muestras: i64,
    pub analisis_palinologicos: i64,
    pub analisis_fisicoquimicos: i64,
}

impl From<RecentActivityType> for RecentActivityResponse {
    fn from(activity: RecentActivityType) -> Self {
        RecentActivityResponse {
            desde: activity.since,
            muestras: activity.samples,
            analisis_palinologicos: activity.palynological_analyses,
            analisis_fisicoquimicos: activity.physicochemical_analyses,
        }
    }
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_dashboard_keys() {
        let now = Utc::now();
        let dashboard = DashboardType {
            totals: EntityTotalsType { samples: 2, ..Default::default() },
            samples_by_month: vec![MonthlyCountType { month: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), total: 2 }],
            species_by_analyses: vec![],
            humidity_by_apiary: vec![],
            recent_activity: RecentActivityType { since: now, samples: 2, palynological_analyses: 0, physicochemical_analyses: 0 },
        };
        let json = serde_json::to_value(DashboardResponse::from(dashboard)).unwrap();
        assert_eq!(json["estadisticas_generales"]["total_muestras"], 2);
        assert_eq!(json["estadisticas_generales"]["total_apicultores"], 0);
        assert_eq!(json["muestras_por_mes"][0]["mes"], "2024-01");
        assert_eq!(json["muestras_por_mes"][0]["total"], 2);
        assert!(json["analisis_por_especie"].as_array().unwrap().is_empty());
        assert!(json["humedad_por_apiario"].as_array().unwrap().is_empty());
        assert_eq!(json["actividad_reciente"]["muestras"], 2);
    }

    #[test]
    fn test_top_species_keys() {
        let species = TopSpeciesType { species_id: 1, scientific_name: "Prosopis alba".to_string(), total_analyses: 3, total_grains: 450 };
        let json = serde_json::to_value(TopSpeciesResponse::from(species)).unwrap();
        assert_eq!(json["scientificName"], "Prosopis alba");
        assert_eq!(json["totalAnalyses"], 3);
        assert_eq!(json["totalGrains"], 450);
    }
}

//! Shared "view pipeline" used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! page selection -> filter -> aggregation set -> assembled view
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::domain::{DashboardConfig, Page};
use crate::error::AppError;
use crate::io::ingest::Dataset;
use crate::view::{self, View};

/// One request: a page, plus the selected entity for entity pages.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub page: Page,
    pub entity: Option<String>,
}

/// Assemble the view for a request. Pure with respect to the dataset: the
/// same dataset and request always produce the same view.
pub fn build_view(
    dataset: &Dataset,
    request: &PageRequest,
    config: &DashboardConfig,
) -> Result<View, AppError> {
    let rows = dataset.rows();

    match request.page {
        Page::Overall => Ok(view::overall_view(&rows, config.series)),
        Page::Startup => {
            let name = require_entity(request)?;
            Ok(view::startup_view(&rows, name, config))
        }
        Page::Investor => {
            let name = require_entity(request)?;
            Ok(view::investor_view(&rows, name, config))
        }
    }
}

fn require_entity(request: &PageRequest) -> Result<&str, AppError> {
    request.entity.as_deref().ok_or_else(|| {
        AppError::new(
            2,
            format!(
                "The {} page requires an entity name.",
                request.page.display_name()
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InvestorMatch, YearSeries};
    use crate::io::ingest::load_dataset_from_reader;
    use std::path::PathBuf;

    const SAMPLE: &str = "\
date,startup,vertical,city,round,investors,amount
01/02/2020,A,SaaS,Pune,Seed,\"X, Y\",10
15/03/2020,B,SaaS,Pune,Seed,X,5
20/01/2021,A,SaaS,Pune,Series A,Y,3
";

    fn config() -> DashboardConfig {
        DashboardConfig {
            csv_path: PathBuf::from("funding.csv"),
            investor_match: InvestorMatch::Exact,
            series: YearSeries::Amount,
            top_n: 5,
            similar_n: 10,
            recent_n: 5,
            export_results: None,
            export_view: None,
        }
    }

    #[test]
    fn build_view_is_deterministic_across_calls() {
        let dataset = load_dataset_from_reader(SAMPLE.as_bytes()).unwrap();
        let request = PageRequest {
            page: Page::Investor,
            entity: Some("X".to_string()),
        };

        let a = build_view(&dataset, &request, &config()).unwrap();
        let b = build_view(&dataset, &request, &config()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn entity_pages_require_a_name() {
        let dataset = load_dataset_from_reader(SAMPLE.as_bytes()).unwrap();
        let request = PageRequest {
            page: Page::Startup,
            entity: None,
        };

        let err = build_view(&dataset, &request, &config()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}

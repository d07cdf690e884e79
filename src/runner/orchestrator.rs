use crate::brief::{ResolvedCodes, SectionData, SectionKind, TripBrief, TripRequest};
use crate::config::{Config, SectionsConfig};
use crate::error::ValidationError;
use crate::provider::Providers;
use crate::resolver::{CodeKind, CodeResolver};
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use super::executor::{SectionOutcome, TaskBudget, TaskExecutor};
use super::sections::{self, SectionContext};

/// Builds a trip brief: validates, resolves codes once, then runs every
/// section concurrently and waits for all of them.
pub struct Orchestrator {
    config: Config,
    executor: TaskExecutor,
    resolver: Arc<CodeResolver>,
    providers: Providers,
}

impl Orchestrator {
    pub fn new(config: Config, providers: Providers) -> Self {
        let executor = TaskExecutor::from_config(&config);
        let resolver = Arc::new(CodeResolver::new(providers.locations.clone()));
        Self {
            config,
            executor,
            resolver,
            providers,
        }
    }

    /// Only a malformed request fails the whole brief; once it validates,
    /// every section reports its own outcome.
    pub async fn plan(&self, request: &TripRequest) -> Result<TripBrief, ValidationError> {
        let plan = request.validate()?;

        let request_id = Uuid::new_v4();
        let span = info_span!("brief", id = %request_id, destination = %plan.destination);

        let brief = async move {
            let origin = self.config.origin_for(plan.origin.as_deref());
            let (city_code, dest_airport_code, origin_code) = tokio::join!(
                self.resolve_bounded(CodeKind::City, &plan.destination),
                self.resolve_bounded(CodeKind::Airport, &plan.destination),
                self.resolve_bounded(CodeKind::Airport, &origin),
            );

            if city_code.is_none() {
                warn!("No city code for {}", plan.destination);
            }
            if dest_airport_code.is_none() {
                warn!("No airport code for {}", plan.destination);
            }

            let codes = ResolvedCodes {
                city_code,
                origin_code,
                dest_airport_code,
            };
            info!(
                "Resolved codes: city={:?} origin={:?} destination={:?}",
                codes.city_code, codes.origin_code, codes.dest_airport_code
            );

            let ctx = Arc::new(SectionContext {
                plan,
                codes,
                providers: self.providers.clone(),
            });

            let sections = self.run_sections(ctx.clone()).await;

            TripBrief {
                destination: ctx.plan.destination.clone(),
                depart_date: ctx.plan.depart_date,
                return_date: ctx.plan.return_date,
                nights: ctx.plan.nights,
                adults: ctx.plan.adults,
                resolved: ctx.codes.clone(),
                sections,
            }
        }
        .instrument(span)
        .await;

        Ok(brief)
    }

    /// Resolution past the deadline counts as unresolved; the section
    /// guards report it.
    async fn resolve_bounded(&self, kind: CodeKind, place: &str) -> Option<String> {
        let limit = Duration::from_millis(self.config.resolver.timeout_ms);
        match time::timeout(limit, self.resolver.resolve(kind, place)).await {
            Ok(code) => code,
            Err(_) => {
                warn!("Resolving {} code for {:?} timed out after {:?}", kind, place, limit);
                None
            }
        }
    }

    async fn run_sections(
        &self,
        ctx: Arc<SectionContext>,
    ) -> BTreeMap<SectionKind, SectionOutcome<SectionData>> {
        let mut futures = FuturesUnordered::new();

        for kind in SectionKind::ALL {
            let budget = budget_for(&self.config.sections, kind);
            let ctx = ctx.clone();
            let executor = self.executor;

            futures.push(async move {
                let outcome = executor
                    .run(kind.name(), budget, move || {
                        let ctx = ctx.clone();
                        async move { sections::run(kind, &ctx).await }
                    })
                    .await;
                (kind, outcome)
            });
        }

        let mut results = BTreeMap::new();
        while let Some((kind, outcome)) = futures.next().await {
            match outcome.failure() {
                None => info!(
                    "Completed {} in {:?} ({} attempt(s))",
                    kind, outcome.elapsed, outcome.attempts
                ),
                Some(failure) => warn!(
                    "Section {} failed after {} attempt(s): {}",
                    kind, outcome.attempts, failure.message
                ),
            }
            results.insert(kind, outcome);
        }

        results
    }
}

fn budget_for(sections: &SectionsConfig, kind: SectionKind) -> TaskBudget {
    let budget = match kind {
        SectionKind::Weather => &sections.weather,
        SectionKind::Restaurants => &sections.restaurants,
        SectionKind::Activities => &sections.activities,
        SectionKind::Hotels => &sections.hotels,
        SectionKind::Flights => &sections.flights,
    };
    TaskBudget::from(budget)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brief::Answer;
    use crate::error::ErrorKind;
    use crate::provider::fake::FakeUpstream;
    use crate::resolver::tests::FakeLookup;
    use crate::resolver::{LocationLookup, LocationMatch};
    use async_trait::async_trait;

    fn paris_request() -> TripRequest {
        TripRequest {
            destination: "Paris, FR".to_string(),
            depart_date: "2026-03-10".to_string(),
            return_date: "2026-03-15".to_string(),
            adults: Some(2),
            origin: None,
        }
    }

    fn orchestrator(
        config: Config,
        fake: &Arc<FakeUpstream>,
        lookup: Arc<FakeLookup>,
    ) -> Orchestrator {
        Orchestrator::new(config, fake.providers(lookup))
    }

    #[tokio::test]
    async fn test_unresolved_city_only_affects_hotels() {
        let fake = Arc::new(FakeUpstream::default());
        let lookup = Arc::new(FakeLookup::with(&[(CodeKind::Airport, "Paris", "CDG")]));
        let orch = orchestrator(Config::default(), &fake, lookup);

        let brief = orch.plan(&paris_request()).await.unwrap();

        assert_eq!(brief.nights, 5);
        assert_eq!(brief.adults, 2);
        assert_eq!(brief.resolved.city_code, None);
        assert_eq!(brief.resolved.dest_airport_code.as_deref(), Some("CDG"));
        assert_eq!(brief.resolved.origin_code.as_deref(), Some("SEA"));
        assert_eq!(brief.sections.len(), 5);

        let hotels = brief.section(SectionKind::Hotels).unwrap();
        assert!(hotels.is_ok());
        assert!(hotels
            .data()
            .unwrap()
            .message()
            .unwrap()
            .contains("IATA city code"));
        assert_eq!(fake.calls_to("hotels"), 0);

        for kind in [
            SectionKind::Weather,
            SectionKind::Restaurants,
            SectionKind::Activities,
            SectionKind::Flights,
        ] {
            let outcome = brief.section(kind).unwrap();
            assert!(outcome.is_ok(), "{} should complete", kind);
            assert!(outcome.data().unwrap().is_available(), "{} should have data", kind);
        }

        // Both legs queried even though neither has offers
        let SectionData::Flights(Answer::Available(legs)) =
            brief.section(SectionKind::Flights).unwrap().data().unwrap()
        else {
            panic!("expected flight legs");
        };
        assert!(legs.outbound.is_empty() && legs.inbound.is_empty());
        assert_eq!(fake.flight_routes().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_section_is_isolated() {
        let fake = Arc::new(FakeUpstream::default().failing(SectionKind::Weather));
        let lookup = Arc::new(FakeLookup::with(&[
            (CodeKind::City, "Lisbon", "LIS"),
            (CodeKind::Airport, "Lisbon", "LIS"),
        ]));
        let orch = orchestrator(Config::default(), &fake, lookup);

        let request = TripRequest {
            destination: "Lisbon".to_string(),
            ..paris_request()
        };
        let brief = orch.plan(&request).await.unwrap();

        let weather = brief.section(SectionKind::Weather).unwrap();
        let failure = weather.failure().unwrap();
        assert_eq!(failure.kind, ErrorKind::Upstream);
        assert!(failure.message.contains("HTTP 503"));
        assert_eq!(weather.attempts, 2);
        assert_eq!(fake.calls_to("weather"), 2);

        for kind in SectionKind::ALL.into_iter().filter(|k| *k != SectionKind::Weather) {
            assert!(brief.section(kind).unwrap().is_ok(), "{} unaffected", kind);
        }
        let hotels = brief.section(SectionKind::Hotels).unwrap().data().unwrap();
        assert!(hotels.is_available());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_section_times_out_without_blocking_others() {
        let fake = Arc::new(
            FakeUpstream::default().slow(SectionKind::Hotels, Duration::from_secs(60)),
        );
        let lookup = Arc::new(FakeLookup::with(&[(CodeKind::City, "Paris", "PAR")]));
        let orch = orchestrator(Config::default(), &fake, lookup);

        let brief = orch.plan(&paris_request()).await.unwrap();

        let hotels = brief.section(SectionKind::Hotels).unwrap();
        let failure = hotels.failure().unwrap();
        assert_eq!(failure.kind, ErrorKind::Timeout);
        assert_eq!(failure.message, "hotels timed out after 14000ms");
        assert_eq!(hotels.attempts, 3);
        assert!(brief.section(SectionKind::Weather).unwrap().is_ok());
    }

    /// A place lookup that never answers
    struct StalledLookup;

    #[async_trait]
    impl LocationLookup for StalledLookup {
        async fn search_locations(
            &self,
            _keyword: &str,
            _kind: CodeKind,
        ) -> Result<Vec<LocationMatch>, crate::error::UpstreamError> {
            time::sleep(Duration::from_secs(24 * 60 * 60)).await;
            Ok(Vec::new())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_resolution_is_bounded() {
        let fake = Arc::new(FakeUpstream::default());
        let orch = Orchestrator::new(Config::default(), fake.providers(Arc::new(StalledLookup)));

        let started = time::Instant::now();
        let brief = time::timeout(Duration::from_secs(120), orch.plan(&paris_request()))
            .await
            .expect("plan should finish despite a stalled lookup")
            .unwrap();

        assert!(started.elapsed() < Duration::from_secs(60));
        assert_eq!(brief.resolved.city_code, None);
        assert_eq!(brief.resolved.dest_airport_code, None);
        assert_eq!(brief.resolved.origin_code.as_deref(), Some("SEA"));
        assert_eq!(brief.sections.len(), 5);

        let hotels = brief.section(SectionKind::Hotels).unwrap().data().unwrap();
        assert!(hotels.message().unwrap().contains("IATA city code"));
        let flights = brief.section(SectionKind::Flights).unwrap().data().unwrap();
        assert!(!flights.is_available());
        assert!(brief.section(SectionKind::Weather).unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_invalid_request_makes_no_calls() {
        let fake = Arc::new(FakeUpstream::default());
        let lookup = Arc::new(FakeLookup::default());
        let orch = orchestrator(Config::default(), &fake, lookup.clone());

        let request = TripRequest {
            return_date: "2026-03-09".to_string(),
            ..paris_request()
        };
        let err = orch.plan(&request).await.unwrap_err();

        assert_eq!(err, ValidationError::ReturnNotAfterDepart);
        assert!(lookup.calls().is_empty());
        assert_eq!(fake.calls_to("weather"), 0);
        assert_eq!(fake.calls_to("geocode"), 0);
    }

    #[tokio::test]
    async fn test_origin_falls_back_to_configured_default() {
        let fake = Arc::new(FakeUpstream::default());
        let lookup = Arc::new(FakeLookup::with(&[(CodeKind::Airport, "Paris", "CDG")]));
        let config = Config {
            default_origin: Some("pdx".to_string()),
            ..Config::default()
        };
        let orch = orchestrator(config, &fake, lookup);

        let brief = orch.plan(&paris_request()).await.unwrap();
        assert_eq!(brief.resolved.origin_code.as_deref(), Some("PDX"));
        assert!(fake
            .flight_routes()
            .iter()
            .any(|(from, to, _)| from == "PDX" && to == "CDG"));

        let explicit = TripRequest {
            origin: Some("lax".to_string()),
            ..paris_request()
        };
        let brief = orch.plan(&explicit).await.unwrap();
        assert_eq!(brief.resolved.origin_code.as_deref(), Some("LAX"));
    }

    #[tokio::test]
    async fn test_brief_serializes_every_section() {
        let fake = Arc::new(FakeUpstream::default());
        let orch = orchestrator(Config::default(), &fake, Arc::new(FakeLookup::default()));

        let brief = orch.plan(&paris_request()).await.unwrap();
        let json = serde_json::to_value(&brief).unwrap();

        assert_eq!(json["nights"], 5);
        for name in ["weather", "restaurants", "activities", "hotels", "flights"] {
            assert_eq!(json["sections"][name]["ok"], true, "{}", name);
        }
        assert_eq!(json["sections"]["hotels"]["data"]["ok"], false);
        assert_eq!(json["sections"]["hotels"]["data"]["reason"], "resolution");
    }
}

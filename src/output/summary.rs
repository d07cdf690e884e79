use crate::brief::{SectionKind, TripBrief};
use crate::runner::SectionOutcome;

/// One status line per section: outer failure first, then the inner message.
pub fn status_line<T>(outcome: &SectionOutcome<T>, inner_message: Option<&str>) -> String {
    match (outcome.failure(), inner_message) {
        (Some(failure), _) => format!("⚠️ {}: {}", outcome.name, failure.message),
        (None, Some(message)) => format!("⚠️ {}: {}", outcome.name, message),
        (None, None) => format!("✅ {}", outcome.name),
    }
}

pub fn status_lines(brief: &TripBrief) -> Vec<String> {
    SectionKind::ALL
        .iter()
        .filter_map(|kind| brief.section(*kind))
        .map(|outcome| status_line(outcome, outcome.data().and_then(|d| d.message())))
        .collect()
}

pub fn render_summary(brief: &TripBrief) -> String {
    let mut content = String::new();

    content.push_str(&format!(
        "Trip brief: {} ({} → {}, {} night{}, {} adult{})\n",
        brief.destination,
        brief.depart_date,
        brief.return_date,
        brief.nights,
        plural(brief.nights),
        brief.adults,
        plural(i64::from(brief.adults)),
    ));

    let code = |c: &Option<String>| c.clone().unwrap_or_else(|| "?".to_string());
    content.push_str(&format!(
        "Codes: city {} | origin {} | destination airport {}\n\n",
        code(&brief.resolved.city_code),
        code(&brief.resolved.origin_code),
        code(&brief.resolved.dest_airport_code),
    ));

    for line in status_lines(brief) {
        content.push_str(&line);
        content.push('\n');
    }

    content
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brief::{Answer, ResolvedCodes, RestaurantList, SectionData};
    use crate::error::ErrorKind;
    use crate::runner::SectionFailure;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn outcome(
        kind: SectionKind,
        result: Result<SectionData, SectionFailure>,
    ) -> SectionOutcome<SectionData> {
        SectionOutcome {
            name: kind.name().to_string(),
            elapsed: Duration::from_millis(120),
            attempts: 1,
            result,
        }
    }

    #[test]
    fn test_status_lines_prefer_outer_error() {
        let mut sections = BTreeMap::new();
        sections.insert(
            SectionKind::Weather,
            outcome(
                SectionKind::Weather,
                Err(SectionFailure {
                    kind: ErrorKind::Timeout,
                    message: "weather timed out after 10000ms".to_string(),
                }),
            ),
        );
        sections.insert(
            SectionKind::Hotels,
            outcome(
                SectionKind::Hotels,
                Ok(SectionData::Hotels(Answer::unresolved("Hotel lookup needs a code"))),
            ),
        );
        sections.insert(
            SectionKind::Restaurants,
            outcome(
                SectionKind::Restaurants,
                Ok(SectionData::Restaurants(Answer::Available(RestaurantList {
                    restaurants: vec![],
                }))),
            ),
        );

        let brief = TripBrief {
            destination: "Oslo".to_string(),
            depart_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2026, 3, 11).unwrap(),
            nights: 1,
            adults: 2,
            resolved: ResolvedCodes::default(),
            sections,
        };

        assert_eq!(
            status_lines(&brief),
            vec![
                "⚠️ weather: weather timed out after 10000ms",
                "✅ restaurants",
                "⚠️ hotels: Hotel lookup needs a code",
            ]
        );

        let text = render_summary(&brief);
        assert!(text.starts_with(
            "Trip brief: Oslo (2026-03-10 → 2026-03-11, 1 night, 2 adults)"
        ));
        assert!(text.contains("city ? | origin ?"));
    }
}

use crate::brief::{Answer, FlightOption, HotelList, SectionData, SectionKind, TripBrief};
use crate::runner::SectionOutcome;
use chrono::NaiveDateTime;

use super::summary::{render_summary, status_line};

/// "2026-02-20T09:18:00" → "Feb 20 • 9:18 AM"; anything unparseable is kept as is
pub fn format_date_time(iso: &str) -> String {
    match NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S") {
        Ok(dt) => dt.format("%b %-d • %-I:%M %p").to_string(),
        Err(_) => iso.to_string(),
    }
}

pub fn format_stops(stops: u32) -> String {
    match stops {
        0 => "Nonstop".to_string(),
        1 => "1 stop".to_string(),
        n => format!("{} stops", n),
    }
}

pub fn render_flights(header: &str, flights: &[FlightOption]) -> String {
    if flights.is_empty() {
        return format!("{}\n\nNo flights found. Try a different date or route.\n", header);
    }

    let blocks: Vec<String> = flights
        .iter()
        .enumerate()
        .map(|(i, f)| {
            format!(
                "{}. {}\n   {} | {}\n   Depart: {}\n   Arrive: {}",
                i + 1,
                f.airline,
                f.price,
                format_stops(f.stops),
                format_date_time(&f.depart_time),
                format_date_time(&f.arrive_time),
            )
        })
        .collect();

    format!("{}\n\n{}\n", header, blocks.join("\n\n"))
}

pub fn render_hotels(header: &str, answer: &Answer<HotelList>) -> String {
    let list = match answer {
        Answer::Available(list) => list,
        Answer::Unavailable { message, .. } => return format!("{}\n\n{}\n", header, message),
    };

    let mut content = format!("{}\n\n", header);
    for (i, hotel) in list.hotels.iter().enumerate() {
        let stars = if hotel.stars > 0 {
            format!(" ({}★)", hotel.stars)
        } else {
            String::new()
        };
        let price = match (hotel.nightly_price, hotel.total_price) {
            (Some(nightly), Some(total)) => format!(
                "{:.0} {}/night, {:.0} {} total",
                nightly, hotel.currency, total, hotel.currency
            ),
            _ => "price N/A".to_string(),
        };
        content.push_str(&format!("{}. {}{}\n   {}\n", i + 1, hotel.name, stars, price));
    }
    content
}

/// Full text rendering: the summary followed by the details of every
/// section that produced data.
pub fn render_brief(brief: &TripBrief) -> String {
    let mut content = render_summary(brief);

    for kind in SectionKind::ALL {
        let Some(data) = brief.section(kind).and_then(|o| o.data()) else {
            continue;
        };
        if !data.is_available() {
            continue;
        }
        content.push('\n');
        content.push_str(&render_section(data));
    }

    content
}

fn render_section(data: &SectionData) -> String {
    match data {
        SectionData::Weather(Answer::Available(report)) => {
            let mut out = format!(
                "Weather in {}: {}",
                report.location, report.current.description
            );
            if let Some(temp) = report.current.temp {
                out.push_str(&format!(", {:.0}°", temp));
            }
            out.push('\n');
            for day in &report.next_days {
                out.push_str(&format!(
                    "  {}: {:.0}°/{:.0}° {} ({:.0}% precip)\n",
                    day.label,
                    day.max,
                    day.min,
                    day.description,
                    day.precip_probability * 100.0
                ));
            }
            out
        }
        SectionData::Restaurants(Answer::Available(list)) => {
            let mut out = "Restaurants:\n".to_string();
            for r in &list.restaurants {
                let rating = r.rating.map(|v| format!(" {:.1}★", v)).unwrap_or_default();
                out.push_str(&format!(
                    "  {}{} ({}) {}\n",
                    r.name, rating, r.category, r.address
                ));
            }
            out
        }
        SectionData::Activities(Answer::Available(list)) => {
            let mut out = format!("Activities ({}):\n", list.source);
            for a in &list.activities {
                match &a.price {
                    Some(price) => out.push_str(&format!("  {} ({})\n", a.name, price)),
                    None => out.push_str(&format!("  {}\n", a.name)),
                }
            }
            out
        }
        SectionData::Hotels(answer) => render_hotels("Hotels:", answer),
        SectionData::Flights(Answer::Available(legs)) => {
            let outbound = render_flights(
                &format!("Outbound {} → {}:", legs.origin, legs.destination),
                &legs.outbound,
            );
            let inbound = render_flights(
                &format!("Return {} → {}:", legs.destination, legs.origin),
                &legs.inbound,
            );
            format!("{}\n{}", outbound, inbound)
        }
        other => other.message().unwrap_or_default().to_string(),
    }
}

/// Status line for a standalone command run through the executor
pub fn render_outcome_line<T>(outcome: &SectionOutcome<T>) -> String {
    status_line(outcome, None)
}

//! Plain-text rendering of a result bundle.

use std::fmt::Write;

use ordermetrics::aggregate::{DateSeries, EventValue};
use ordermetrics::{BundleState, ResultBundle};

pub const NO_DATA_MESSAGE: &str = "No data found for the selected filters.";

pub fn render_text(bundle: &ResultBundle) -> String {
    let mut out = String::new();
    write_report(&mut out, bundle).expect("writing to a String cannot fail");
    out
}

fn write_report(out: &mut String, bundle: &ResultBundle) -> std::fmt::Result {
    let events = if bundle.selected_events.is_empty() {
        "all".to_string()
    } else {
        bundle.selected_events.join(", ")
    };
    writeln!(out, "Events: {}", events)?;
    writeln!(out, "Confirmed when: {}", bundle.policy.describe())?;

    if bundle.state == BundleState::NoMatchingOrders {
        writeln!(out)?;
        writeln!(out, "{}", NO_DATA_MESSAGE)?;
        return Ok(());
    }

    let summary = &bundle.summary;
    writeln!(
        out,
        "Confirmed orders: {} of {} ({:.1}%)",
        summary.total_orders, summary.filtered_orders, summary.confirmed_pct
    )?;
    writeln!(out, "Total amount: {:.2}", summary.total_amount)?;
    writeln!(out, "Average amount: {:.2}", summary.avg_amount)?;

    writeln!(out)?;
    writeln!(out, "Orders by state:")?;
    for state in &bundle.state_distribution {
        let label = state
            .state_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        writeln!(out, "  {:>8}  {}", label, state.count)?;
    }

    if let Some(funnel) = &bundle.funnel {
        writeln!(out)?;
        writeln!(out, "Funnel:")?;
        for stage in &funnel.pareto {
            writeln!(
                out,
                "  {:<18} {:>8}  {:>6.1}%",
                stage.stage.label(),
                stage.value,
                stage.cumulative_pct
            )?;
        }
        writeln!(out, "  Conversion rate: {:.2}%", funnel.conversion_rate)?;
        writeln!(out, "  User value: {:.2}", funnel.user_value)?;
    }

    if bundle.state == BundleState::NoConfirmedOrders {
        writeln!(out)?;
        writeln!(out, "{}", NO_DATA_MESSAGE)?;
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "Revenue by date:")?;
    match &bundle.amount_by_date {
        DateSeries::Single(points) => {
            for point in points {
                writeln!(out, "  {}  {:>10.2}", point.date, point.amount)?;
            }
        }
        DateSeries::PerEvent(points) => {
            for point in points {
                writeln!(
                    out,
                    "  {}  {:<28} {:>10.2}",
                    point.date, point.event_name, point.amount
                )?;
            }
        }
    }

    write_event_values(out, "Total revenue by event:", &bundle.total_amount_by_event)?;
    write_event_values(
        out,
        &format!("{} by event:", bundle.event_metric.metric.label()),
        &bundle.event_metric.values,
    )?;

    writeln!(out)?;
    writeln!(out, "Price distribution:")?;
    for bucket in &bundle.price_distribution {
        writeln!(out, "  {:>6}  {}", bucket.bucket.label, bucket.count)?;
    }

    Ok(())
}

fn write_event_values(out: &mut String, title: &str, values: &[EventValue]) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "{}", title)?;
    for value in values {
        writeln!(out, "  {:<28} {:>10.2}", value.event_name, value.value)?;
    }
    Ok(())
}

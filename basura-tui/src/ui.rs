use basura_core::{
    model::{ClassificationResult, Period, WasteLevel},
    service::{DashboardSnapshot, PredictionReport, RemoteOutcome},
    stats::top_n,
};
use chrono::Local;
use ratatui::{
    prelude::*,
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row,
        Table, TableState, Wrap,
    },
};

use crate::app::{App, FormField, Screen};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    let header = Paragraph::new("basura – barangay waste levels and collection planning")
        .block(Block::default().borders(Borders::ALL).title("Basura"));
    frame.render_widget(header, *header_area);

    match app.screen {
        Screen::SourceSelect => draw_source_select(frame, app, *content_area),
        Screen::Dashboard => draw_dashboard(frame, app, *content_area),
        Screen::Predict => draw_predict(frame, app, *content_area),
    }

    let nav_hint = match app.screen {
        Screen::SourceSelect => "↑/↓ move · Enter/Space open dashboard · q/Ctrl-C quit",
        Screen::Dashboard => {
            "↑/↓ districts · r refresh · p/Tab predict · Esc/←/b sources · q/Ctrl-C quit"
        }
        Screen::Predict => "Tab next field · ←/→ period · Enter predict · Esc dashboard · Ctrl-C quit",
    };

    let status_text = if app.is_loading {
        format!("Loading… · {nav_hint}")
    } else if let Some(msg) = &app.error_message {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_source_select(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let items = app
        .sources
        .iter()
        .enumerate()
        .map(|(idx, (_id, name))| {
            let prefix = if idx == app.source_list_index {
                "> "
            } else {
                "  "
            };
            ListItem::new(format!("{prefix}{name}"))
        })
        .collect::<Vec<ListItem<'_>>>();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Select data source (↑/↓, Enter)"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !app.sources.is_empty() {
        state.select(Some(app.source_list_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_dashboard(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(snapshot) = &app.snapshot else {
        let text = if app.is_loading {
            "Loading analytics…"
        } else {
            "No data loaded. Press r to refresh or Esc to pick another source."
        };
        let paragraph = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Dashboard – {}", app.selected_source_name())),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    };

    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // cards
            Constraint::Min(10),    // charts
            Constraint::Length(10), // tables
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [cards_area, charts_area, tables_area] = chunks else {
        return;
    };

    draw_cards(frame, snapshot, *cards_area);

    let chart_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(*charts_area);
    if let [bars_area, distribution_area] = chart_chunks.as_ref() {
        draw_volume_chart(frame, snapshot, *bars_area);
        draw_distribution(frame, snapshot, *distribution_area);
    }

    let table_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(*tables_area);
    if let [districts_area, top_area] = table_chunks.as_ref() {
        draw_district_table(frame, app, snapshot, *districts_area);
        draw_top_list(frame, app, snapshot, *top_area);
    }
}

fn draw_cards(frame: &mut Frame<'_>, snapshot: &DashboardSnapshot, area: Rect) {
    let summary = &snapshot.summary;
    let highest = top_n(&snapshot.results, 1).into_iter().next().map_or_else(
        || "–".to_owned(),
        |result| {
            format!(
                "{} ({:.0} kg)",
                result.measurement().district_name(),
                result.measurement().volume_kg_per_day()
            )
        },
    );
    let updated = snapshot.generated_at.with_timezone(&Local).format("%H:%M:%S");

    let cards = [
        (
            "Total today".to_owned(),
            format!("{:.0} kg/day", summary.total_volume_kg()),
        ),
        (
            "Average / range".to_owned(),
            format!(
                "{:.1} kg ({:.0}–{:.0})",
                summary.average_volume_kg(), summary.min_volume_kg(), summary.max_volume_kg()
            ),
        ),
        ("Highest".to_owned(), highest),
        (
            format!("Trucks needed · {updated}"),
            format!(
                "{} across {} districts",
                snapshot.total_fleet, summary.total_records()
            ),
        ),
    ];

    let card_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((title, value), card_area) in cards.into_iter().zip(card_chunks.iter()) {
        let card = Paragraph::new(value)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(card, *card_area);
    }
}

fn draw_volume_chart(frame: &mut Frame<'_>, snapshot: &DashboardSnapshot, area: Rect) {
    let bars: Vec<Bar<'_>> = snapshot
        .results
        .iter()
        .map(|result| {
            let volume = result.measurement().volume_kg_per_day();
            Bar::default()
                .value(bar_value(volume))
                .text_value(format!("{volume:.0}"))
                .label(Line::from(result.measurement().district_name().to_owned()))
                .style(Style::default().fg(level_color(result.level())))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Waste per district (kg/day)"),
        )
        .bar_width(10)
        .bar_gap(2)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

fn draw_distribution(frame: &mut Frame<'_>, snapshot: &DashboardSnapshot, area: Rect) {
    let summary = &snapshot.summary;
    let items = WasteLevel::ALL
        .into_iter()
        .map(|level| {
            let share = summary.share(level);
            let line = format!(
                "{:<10}{:>4}  {share:>5.1}%  {}",
                level.label(),
                summary.count(level),
                share_bar(share)
            );
            ListItem::new(line).style(Style::default().fg(level_color(level)))
        })
        .collect::<Vec<ListItem<'_>>>();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Level distribution"),
    );
    frame.render_widget(list, area);
}

fn draw_district_table(
    frame: &mut Frame<'_>,
    app: &App,
    snapshot: &DashboardSnapshot,
    area: Rect,
) {
    let rows = snapshot.results.iter().enumerate().map(|(idx, result)| {
        let mut style = Style::default().fg(level_color(result.level()));
        if idx == app.district_list_index {
            style = style.add_modifier(Modifier::REVERSED);
        }
        Row::new(vec![
            Cell::from(result.measurement().district_name().to_owned()),
            Cell::from(format!("{:.1}", result.measurement().volume_kg_per_day())),
            Cell::from(format!("{:.1}", result.weekly_volume_kg())),
            Cell::from(result.level().label()),
            Cell::from(result.recommended_frequency().to_string()),
            Cell::from(result.recommended_fleet_size().to_string()),
        ])
        .style(style)
    });

    let column_widths = [
        Constraint::Min(14),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(10),
        Constraint::Length(28),
        Constraint::Length(6),
    ];

    let table = Table::new(rows, column_widths)
        .header(
            Row::new(vec!["District", "kg/day", "kg/week", "Level", "Pickups", "Trucks"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title("Districts"))
        .column_spacing(1);

    let mut state = TableState::default();
    if !snapshot.results.is_empty() {
        state.select(Some(app.district_list_index));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_top_list(frame: &mut Frame<'_>, app: &App, snapshot: &DashboardSnapshot, area: Rect) {
    let items = if snapshot.top.is_empty() {
        vec![ListItem::new("Ranking disabled (--top 0).")]
    } else {
        snapshot
            .top
            .iter()
            .enumerate()
            .map(|(idx, result)| {
                ListItem::new(format!(
                    "{}. {} – {:.0} kg/day",
                    idx + 1,
                    result.measurement().district_name(),
                    result.measurement().volume_kg_per_day()
                ))
                .style(Style::default().fg(level_color(result.level())))
            })
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Top {} offenders", app.top)),
    );
    frame.render_widget(list, area);
}

fn draw_predict(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [form_area, result_area] = chunks else {
        return;
    };

    let form_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(*form_area);

    if let [district_area, volume_area, period_area, help_area] = form_chunks.as_ref() {
        let district = Paragraph::new(app.district_input.as_str())
            .block(field_block("Barangay name", app.focus == FormField::District));
        frame.render_widget(district, *district_area);

        let volume = Paragraph::new(app.volume_input.as_str())
            .block(field_block("Waste volume (kg)", app.focus == FormField::Volume));
        frame.render_widget(volume, *volume_area);

        let period_text = match app.period {
            Period::Daily => "[daily]  weekly",
            Period::Weekly => " daily  [weekly]",
        };
        let period = Paragraph::new(period_text)
            .block(field_block("Measured per", app.focus == FormField::Period));
        frame.render_widget(period, *period_area);

        let help = Paragraph::new(
            "Daily volumes are multiplied by 7; levels are judged on the weekly figure. \
             The external predictor, if the source has one, is shown separately.",
        )
        .block(Block::default().borders(Borders::ALL).title("How it works"))
        .wrap(Wrap { trim: true });
        frame.render_widget(help, *help_area);
    }

    let title = format!("Prediction – {}", app.selected_source_name());
    let body = match &app.report {
        Some(report) => report_lines(report),
        None if app.is_loading => vec![Line::from("Predicting…")],
        None => vec![Line::from(
            "Enter a barangay and its waste volume, then press Enter.",
        )],
    };

    let result = Paragraph::new(body)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: true });
    frame.render_widget(result, *result_area);
}

fn report_lines(report: &PredictionReport) -> Vec<Line<'static>> {
    let local = &report.local;
    let mut lines = vec![
        Line::from(Span::styled(
            local.measurement().district_name().to_owned(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        level_line(local),
        Line::from(format!(
            "Input: {:.2} kg/day · Weekly: {:.2} kg",
            local.measurement().volume_kg_per_day(),
            local.weekly_volume_kg()
        )),
        Line::from(format!(
            "Pickups: {} · Trucks: {}",
            local.recommended_frequency(), local.recommended_fleet_size()
        )),
        Line::from(local.recommendation()),
        Line::from(""),
    ];

    let remote = match &report.remote {
        RemoteOutcome::Agrees(prediction) => Line::from(Span::styled(
            format!(
                "Predictor agrees: {} ({:.1} kg/day, {:.1} kg/week)",
                prediction.level, prediction.predicted_daily_kg, prediction.predicted_weekly_kg
            ),
            Style::default().fg(Color::Green),
        )),
        RemoteOutcome::Disagrees(prediction) => Line::from(Span::styled(
            format!(
                "Predictor says {} ({:.1} kg/day, {:.1} kg/week); threshold table result above stands",
                prediction.level, prediction.predicted_daily_kg, prediction.predicted_weekly_kg
            ),
            Style::default().fg(Color::Yellow),
        )),
        RemoteOutcome::Unavailable(reason) => Line::from(Span::styled(
            format!("Predictor unavailable: {reason}"),
            Style::default().fg(Color::Red),
        )),
        RemoteOutcome::NotConfigured => Line::from(Span::styled(
            "No external predictor for this source",
            Style::default().fg(Color::DarkGray),
        )),
    };
    lines.push(remote);
    lines
}

fn level_line(result: &ClassificationResult) -> Line<'static> {
    Line::from(vec![
        Span::raw("Level: "),
        Span::styled(
            format!("{} Waste Level", result.level()),
            Style::default()
                .fg(level_color(result.level()))
                .add_modifier(Modifier::BOLD),
        ),
    ])
}

fn field_block(title: &str, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title.to_owned())
}

fn level_color(level: WasteLevel) -> Color {
    match level {
        WasteLevel::Low => Color::Green,
        WasteLevel::Medium => Color::Yellow,
        WasteLevel::High => Color::LightRed,
        WasteLevel::VeryHigh => Color::Red,
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "volumes are validated non-negative and far below u64::MAX"
)]
fn bar_value(volume_kg: f64) -> u64 {
    volume_kg.round() as u64
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "share is a percentage between 0 and 100"
)]
fn share_bar(share: f64) -> String {
    "█".repeat((share / 5.0).round() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_bar_length() {
        assert_eq!(share_bar(0.0), "");
        assert_eq!(share_bar(50.0).chars().count(), 10);
        assert_eq!(share_bar(100.0).chars().count(), 20);
    }

    #[test]
    fn test_bar_value_rounds() {
        assert_eq!(bar_value(849.6), 850);
        assert_eq!(bar_value(0.0), 0);
    }
}

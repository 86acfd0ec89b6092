//! The lights tool: list every light with its on/off state and toggle one by
//! number until the user enters a blank line.

use std::io::{BufRead, Write};
use std::num::IntErrorKind;
use std::time::Duration;

use clap::ValueEnum;

use crate::client::{Hub, SETTLE_DELAY};
use crate::entity::{EntityDomain, EntityState, filter_by_domain};
use crate::error::Error;
use crate::table::{DisplayRow, render_rows};
use crate::Outcome;

/// Optional state filter given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StateFilter {
    On,
    Off,
}

impl StateFilter {
    pub fn keeps(&self, light: &Light) -> bool {
        match self {
            StateFilter::On => light.is_on,
            StateFilter::Off => !light.is_on,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Light {
    pub entity_id: String,
    pub name: String,
    pub is_on: bool,
}

impl Light {
    pub fn from_state(state: &EntityState) -> Self {
        Self {
            entity_id: state.entity_id.clone(),
            name: state.display_name(),
            is_on: state.state.eq_ignore_ascii_case("on"),
        }
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_on { "ON" } else { "OFF" }
    }
}

/// Numbers `lights` from 1 in the order given.
pub fn display_rows(lights: &[Light]) -> Vec<DisplayRow> {
    lights
        .iter()
        .enumerate()
        .map(|(i, light)| DisplayRow::new(i + 1, light.name.clone(), light.status_label()))
        .collect()
}

/// What a line typed at the prompt means for a table of `count` rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Exit,
    /// Zero-based position in the rendered table.
    Toggle(usize),
    Invalid(String),
}

impl Selection {
    pub fn parse(input: &str, count: usize) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return Selection::Exit;
        }
        let out_of_range = || {
            Selection::Invalid(format!("Please enter a number between 1 and {}.", count))
        };
        match input.parse::<i64>() {
            Ok(n) if n >= 1 && (n as u64) <= count as u64 => Selection::Toggle(n as usize - 1),
            Ok(_) => out_of_range(),
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                out_of_range()
            }
            Err(_) => Selection::Invalid(format!("'{}' is not a number.", input)),
        }
    }
}

/// Fetches every light from the hub, in hub order.
pub async fn fetch_lights<H: Hub>(hub: &H) -> Result<Vec<Light>, Error> {
    let ids = hub.list_entities().await?;
    let mut lights = Vec::new();
    for id in filter_by_domain(&ids, EntityDomain::Light) {
        let state = hub.get_state(&id).await?;
        lights.push(Light::from_state(&state));
    }
    tracing::debug!(count = lights.len(), "fetched lights");
    Ok(lights)
}

// =============================================================================
// Interaction loop
// =============================================================================

pub struct LightsSession<'a, H> {
    hub: &'a H,
    filter: Option<StateFilter>,
    color: bool,
    settle_delay: Duration,
}

impl<'a, H: Hub> LightsSession<'a, H> {
    pub fn new(hub: &'a H, filter: Option<StateFilter>, color: bool) -> Self {
        Self {
            hub,
            filter,
            color,
            settle_delay: SETTLE_DELAY,
        }
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Runs until the user enters a blank line or input ends.
    ///
    /// Every round starts from a fresh fetch, so the table after a toggle
    /// shows what the hub reports rather than a locally flipped state.
    pub async fn run<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        out: &mut W,
    ) -> Result<Outcome, Error> {
        loop {
            let lights = fetch_lights(self.hub).await?;
            if lights.is_empty() {
                writeln!(out, "No light entities found.")?;
                return Ok(Outcome::NoEntities);
            }

            let lights: Vec<Light> = match self.filter {
                Some(filter) => lights.into_iter().filter(|l| filter.keeps(l)).collect(),
                None => lights,
            };
            if lights.is_empty() {
                let state = match self.filter {
                    Some(StateFilter::Off) => "off",
                    _ => "on",
                };
                writeln!(out, "No lights are currently {}.", state)?;
                return Ok(Outcome::NoMatches);
            }

            writeln!(out)?;
            write!(out, "{}", render_rows(&display_rows(&lights), self.color))?;
            writeln!(out)?;
            write!(out, "Enter a number to toggle (blank to exit): ")?;
            out.flush()?;

            let Some(line) = read_line(input)? else {
                writeln!(out)?;
                writeln!(out, "Goodbye!")?;
                return Ok(Outcome::Finished);
            };

            match Selection::parse(&line, lights.len()) {
                Selection::Exit => {
                    writeln!(out, "Goodbye!")?;
                    return Ok(Outcome::Finished);
                }
                Selection::Invalid(message) => {
                    tracing::debug!(input = line.trim(), "rejected selection");
                    writeln!(out, "{}", message)?;
                    write!(out, "Press Enter to continue...")?;
                    out.flush()?;
                    if read_line(input)?.is_none() {
                        writeln!(out)?;
                        writeln!(out, "Goodbye!")?;
                        return Ok(Outcome::Finished);
                    }
                }
                Selection::Toggle(position) => {
                    let light = &lights[position];
                    self.hub
                        .call_service(EntityDomain::Light, "toggle", &light.entity_id)
                        .await?;
                    writeln!(out, "Toggled {}.", light.name)?;
                    tokio::time::sleep(self.settle_delay).await;
                }
            }
        }
    }
}

/// `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    match input.read_line(&mut line)? {
        0 => Ok(None),
        _ => Ok(Some(line)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttrValue;
    use crate::testing::FakeHub;
    use std::io::Cursor;

    fn entity(id: &str, state: &str, friendly_name: Option<&str>) -> EntityState {
        EntityState {
            entity_id: id.into(),
            state: state.into(),
            attributes: friendly_name
                .map(|n| ("friendly_name", AttrValue::Text(n.into())))
                .into_iter()
                .collect(),
        }
    }

    fn sample_hub() -> FakeHub {
        FakeHub::new(vec![
            entity("light.kitchen", "on", Some("Kitchen")),
            entity("sensor.outside", "12", None),
            entity("light.hall", "off", None),
        ])
    }

    async fn run_session(
        hub: &FakeHub,
        filter: Option<StateFilter>,
        input: &str,
    ) -> (Outcome, String) {
        let mut input = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        let outcome = LightsSession::new(hub, filter, false)
            .with_settle_delay(Duration::ZERO)
            .run(&mut input, &mut out)
            .await
            .unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn parses_selection() {
        assert_eq!(Selection::parse("  \n", 3), Selection::Exit);
        assert_eq!(Selection::parse("2\n", 3), Selection::Toggle(1));
        assert!(matches!(Selection::parse("0", 3), Selection::Invalid(_)));
        assert!(matches!(Selection::parse("-1", 3), Selection::Invalid(_)));
        assert!(matches!(Selection::parse("4", 3), Selection::Invalid(_)));
        assert!(matches!(Selection::parse("two", 3), Selection::Invalid(_)));
    }

    #[test]
    fn oversized_numbers_are_out_of_range() {
        let expected = Selection::Invalid("Please enter a number between 1 and 3.".into());
        assert_eq!(Selection::parse("99999999999999999999", 3), expected);
        assert_eq!(Selection::parse("-99999999999999999999", 3), expected);
    }

    #[test]
    fn status_is_case_insensitive() {
        assert!(Light::from_state(&entity("light.a", "ON", None)).is_on);
        assert!(!Light::from_state(&entity("light.a", "unavailable", None)).is_on);
    }

    #[tokio::test]
    async fn renders_table_and_exits_on_blank_line() {
        let hub = sample_hub();
        let (outcome, out) = run_session(&hub, None, "\n").await;

        assert_eq!(outcome, Outcome::Finished);
        assert!(out.contains("1. Kitchen  ON\n2. Hall     OFF\n"));
        assert!(out.ends_with("Goodbye!\n"));
        assert!(hub.calls().is_empty());
    }

    #[tokio::test]
    async fn valid_selection_toggles_exactly_that_light() {
        let hub = sample_hub();
        let (outcome, out) = run_session(&hub, None, "2\n\n").await;

        assert_eq!(outcome, Outcome::Finished);
        assert_eq!(
            hub.calls(),
            vec![("light".into(), "toggle".into(), "light.hall".into())]
        );
        assert!(out.contains("Toggled Hall."));
        // The second table comes from a fresh fetch
        assert!(out.contains("2. Hall     ON\n"));
    }

    #[tokio::test]
    async fn invalid_selections_never_call_the_hub() {
        let hub = sample_hub();
        let (outcome, out) = run_session(&hub, None, "0\n\n-3\n\nabc\n\n9\n\n\n").await;

        assert_eq!(outcome, Outcome::Finished);
        assert!(hub.calls().is_empty());
        assert_eq!(out.matches("Press Enter to continue...").count(), 4);
        assert!(out.contains("'abc' is not a number."));
    }

    #[tokio::test]
    async fn end_of_input_ends_session() {
        let hub = sample_hub();
        let (outcome, _) = run_session(&hub, None, "").await;
        assert_eq!(outcome, Outcome::Finished);
        assert!(hub.calls().is_empty());
    }

    #[tokio::test]
    async fn end_of_input_at_acknowledgment_says_goodbye() {
        let hub = sample_hub();
        let (outcome, out) = run_session(&hub, None, "abc\n").await;
        assert_eq!(outcome, Outcome::Finished);
        assert!(out.ends_with("Press Enter to continue...\nGoodbye!\n"));
        assert!(hub.calls().is_empty());
    }

    #[tokio::test]
    async fn filter_renumbers_rows() {
        let hub = sample_hub();
        let (_, out) = run_session(&hub, Some(StateFilter::On), "1\n\n").await;

        assert!(out.contains("1. Kitchen  ON\n"));
        assert!(!out.contains("Hall"));
        assert_eq!(
            hub.calls(),
            vec![("light".into(), "toggle".into(), "light.kitchen".into())]
        );
    }

    #[tokio::test]
    async fn filter_with_no_matches_ends_session() {
        let hub = FakeHub::new(vec![entity("light.hall", "off", None)]);
        let (outcome, out) = run_session(&hub, Some(StateFilter::On), "").await;
        assert_eq!(outcome, Outcome::NoMatches);
        assert_eq!(out, "No lights are currently on.\n");
    }

    #[tokio::test]
    async fn no_lights_at_all_is_reported() {
        let hub = FakeHub::new(vec![entity("switch.fan", "on", None)]);
        let (outcome, out) = run_session(&hub, None, "").await;
        assert_eq!(outcome, Outcome::NoEntities);
        assert_eq!(out, "No light entities found.\n");
    }
}

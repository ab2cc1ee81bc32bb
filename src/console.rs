//! Terminal presentation sink
//!
//! Renders [`PresentationEvent`]s as text panels: suggestion list, map
//! camera action, details panel, weather panel and recent list. Panels that a
//! selection update leaves unchanged are not printed again.

use crate::cache::RecentEntry;
use crate::models::{AddressDetail, BoundaryCandidate, WeatherSnapshot};
use crate::session::PresentationEvent;
use crate::view_fit::ViewFitPlan;
use std::fmt::Write;

/// One line of prompt input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptCommand {
    /// Plain text, treated as live typing
    Type(String),
    /// `:go TEXT` commits raw text
    Go(String),
    /// `:pick N` commits suggestion N
    Pick(usize),
    /// `:recent N` recalls recent entry N
    Recent(usize),
    Clear,
    Quit,
    Invalid(String),
}

impl PromptCommand {
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(command) = line.strip_prefix(':') else {
            return PromptCommand::Type(line.to_string());
        };

        let (name, argument) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(name, rest)| (name, rest.trim()));

        match name {
            "go" if !argument.is_empty() => PromptCommand::Go(argument.to_string()),
            "pick" => argument
                .parse()
                .map_or_else(|_| PromptCommand::Invalid(line.to_string()), PromptCommand::Pick),
            "recent" => argument
                .parse()
                .map_or_else(|_| PromptCommand::Invalid(line.to_string()), PromptCommand::Recent),
            "clear" => PromptCommand::Clear,
            "quit" | "q" => PromptCommand::Quit,
            _ => PromptCommand::Invalid(line.to_string()),
        }
    }
}

/// Usage text printed for unrecognized input
pub const HELP: &str = "Type to search, :go TEXT to select, :pick N, :recent N, :clear, :quit";

#[derive(Debug, Default)]
pub struct ConsoleSink {
    suggestions: Vec<BoundaryCandidate>,
    recent: Vec<RecentEntry>,
    shown_selection: Option<String>,
    shown_address: Option<AddressDetail>,
    shown_weather: Option<WeatherSnapshot>,
}

impl ConsoleSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Suggestion by its 1-based number as printed
    #[must_use]
    pub fn suggestion(&self, number: usize) -> Option<&BoundaryCandidate> {
        number.checked_sub(1).and_then(|i| self.suggestions.get(i))
    }

    /// Recent entry by its 1-based number as printed
    #[must_use]
    pub fn recent(&self, number: usize) -> Option<&RecentEntry> {
        number.checked_sub(1).and_then(|i| self.recent.get(i))
    }

    /// Update sink state from `event` and return the text to print
    pub fn render(&mut self, event: &PresentationEvent) -> String {
        let mut out = String::new();
        match event {
            PresentationEvent::SuggestionsChanged(candidates) => {
                self.suggestions = candidates.clone();
                for (i, candidate) in candidates.iter().enumerate() {
                    let _ = writeln!(out, "  {}) {}", i + 1, candidate.display_name);
                }
            }
            PresentationEvent::SelectionChanged {
                candidate,
                address,
                weather,
            } => self.render_selection(&mut out, candidate, address.as_ref(), weather.as_ref()),
            PresentationEvent::ViewPlanReady(plan) => {
                let _ = writeln!(out, "Map: {}", describe_plan(plan));
            }
            PresentationEvent::RecentListChanged(entries) => {
                self.recent = entries.clone();
                let list = entries
                    .iter()
                    .enumerate()
                    .map(|(i, entry)| format!("{}) {}", i + 1, entry.name))
                    .collect::<Vec<_>>()
                    .join("  ");
                let _ = writeln!(out, "Recent: {list}");
            }
            PresentationEvent::Cleared => {
                self.suggestions.clear();
                self.shown_selection = None;
                self.shown_address = None;
                self.shown_weather = None;
                out.push_str(&weather_panel(None));
            }
            PresentationEvent::CommitFailed(error) => {
                let _ = writeln!(out, "! {}", error.user_message());
            }
        }
        out
    }

    fn render_selection(
        &mut self,
        out: &mut String,
        candidate: &BoundaryCandidate,
        address: Option<&AddressDetail>,
        weather: Option<&WeatherSnapshot>,
    ) {
        if self.shown_selection.as_deref() != Some(candidate.id.as_str()) {
            self.shown_selection = Some(candidate.id.clone());
            self.shown_address = None;
            self.shown_weather = None;
            let _ = writeln!(out, "Selected: {}", candidate.display_name);
        }

        if let Some(address) = address.filter(|a| self.shown_address.as_ref() != Some(*a)) {
            out.push_str(&details_panel(candidate, address));
            self.shown_address = Some(address.clone());
        }

        if let Some(weather) = weather.filter(|w| self.shown_weather.as_ref() != Some(*w)) {
            out.push_str(&weather_panel(Some(weather)));
            self.shown_weather = Some(weather.clone());
        }
    }
}

fn describe_plan(plan: &ViewFitPlan) -> String {
    match plan {
        ViewFitPlan::FitBounds {
            bounds,
            vertical_padding,
        } => format!(
            "fit bounds {:?} with {:.0}px vertical padding",
            bounds.as_array(),
            vertical_padding
        ),
        ViewFitPlan::FlyToBounds { bounds } => format!("fly to bounds {:?}", bounds.as_array()),
        ViewFitPlan::FlyToPoint {
            latitude,
            longitude,
            zoom,
        } => format!("fly to ({latitude:.4}, {longitude:.4}) at zoom {zoom}"),
    }
}

fn details_panel(candidate: &BoundaryCandidate, address: &AddressDetail) -> String {
    let bbox = candidate.bounding_box.as_array();
    format!(
        "--- Details ---\n\
         Place: {}\n\
         Coordinates: {}\n\
         Bounding Box: [{}, {}, {}, {}]\n\
         District: {}\n\
         State: {}\n\
         Country: {}\n",
        candidate.place_name(),
        candidate.format_coordinates(),
        bbox[0],
        bbox[1],
        bbox[2],
        bbox[3],
        address.district,
        address.state,
        address.country
    )
}

fn weather_panel(weather: Option<&WeatherSnapshot>) -> String {
    match weather {
        Some(w) => format!(
            "--- Weather: {} ---\n\
             Temperature: {}\n\
             Humidity: {:.0}%\n\
             Min Temp: {:.1} °C\n\
             Max Temp: {:.1} °C\n\
             Wind Speed: {}\n",
            w.location_name,
            w.format_temperature(),
            w.humidity_pct,
            w.min_temp_c,
            w.max_temp_c,
            w.format_wind()
        ),
        None => "--- Weather: Location ---\n\
                 Temperature: -- °C\n\
                 Humidity: --%\n\
                 Min Temp: -- °C\n\
                 Max Temp: -- °C\n\
                 Wind Speed: -- m/s\n"
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BoundingBox;
    use crate::LookupError;
    use chrono::Utc;
    use rstest::rstest;

    fn candidate() -> BoundaryCandidate {
        BoundaryCandidate {
            id: "101".to_string(),
            display_name: "Bavaria, Germany".to_string(),
            latitude: 48.9467562,
            longitude: 11.4038717,
            bounding_box: BoundingBox::new(47.27, 50.56, 8.97, 13.83),
            geometry: None,
        }
    }

    fn weather() -> WeatherSnapshot {
        WeatherSnapshot {
            location_name: "Ingolstadt".to_string(),
            temperature_c: 17.0,
            humidity_pct: 70.0,
            min_temp_c: 15.0,
            max_temp_c: 19.0,
            wind_speed_ms: 2.0,
            latitude: 48.9467562,
            longitude: 11.4038717,
            fetched_at: Utc::now(),
        }
    }

    #[rstest]
    #[case("bavaria", PromptCommand::Type("bavaria".to_string()))]
    #[case("  :go Tyrol ", PromptCommand::Go("Tyrol".to_string()))]
    #[case(":go", PromptCommand::Invalid(":go".to_string()))]
    #[case(":pick 2", PromptCommand::Pick(2))]
    #[case(":pick two", PromptCommand::Invalid(":pick two".to_string()))]
    #[case(":recent 1", PromptCommand::Recent(1))]
    #[case(":clear", PromptCommand::Clear)]
    #[case(":quit", PromptCommand::Quit)]
    #[case(":frobnicate", PromptCommand::Invalid(":frobnicate".to_string()))]
    fn test_prompt_parsing(#[case] line: &str, #[case] expected: PromptCommand) {
        assert_eq!(PromptCommand::parse(line), expected);
    }

    #[test]
    fn test_suggestions_are_numbered_from_one() {
        let mut sink = ConsoleSink::new();
        let text = sink.render(&PresentationEvent::SuggestionsChanged(vec![candidate()]));
        assert_eq!(text, "  1) Bavaria, Germany\n");
        assert_eq!(sink.suggestion(1).unwrap().id, "101");
        assert!(sink.suggestion(0).is_none());
        assert!(sink.suggestion(2).is_none());
    }

    #[test]
    fn test_selection_panels_print_once() {
        let mut sink = ConsoleSink::new();
        let first = sink.render(&PresentationEvent::SelectionChanged {
            candidate: candidate(),
            address: Some(AddressDetail::new("Upper Bavaria", "Bavaria", "Germany")),
            weather: None,
        });
        assert!(first.contains("Selected: Bavaria, Germany"));
        assert!(first.contains("Place: Bavaria\n"));
        assert!(first.contains("District: Upper Bavaria"));
        assert!(!first.contains("Weather"));

        let second = sink.render(&PresentationEvent::SelectionChanged {
            candidate: candidate(),
            address: Some(AddressDetail::new("Upper Bavaria", "Bavaria", "Germany")),
            weather: Some(weather()),
        });
        assert!(!second.contains("Selected:"));
        assert!(!second.contains("Details"));
        assert!(second.contains("--- Weather: Ingolstadt ---"));
        assert!(second.contains("Humidity: 70%"));
    }

    #[test]
    fn test_new_selection_reprints_identical_address() {
        let mut sink = ConsoleSink::new();
        let address = AddressDetail::new("Upper Bavaria", "Bavaria", "Germany");
        sink.render(&PresentationEvent::SelectionChanged {
            candidate: candidate(),
            address: Some(address.clone()),
            weather: Some(weather()),
        });

        let mut neighbour = candidate();
        neighbour.id = "102".to_string();
        neighbour.display_name = "Freising, Germany".to_string();
        let text = sink.render(&PresentationEvent::SelectionChanged {
            candidate: neighbour,
            address: Some(address),
            weather: Some(weather()),
        });
        assert!(text.contains("Selected: Freising, Germany"));
        assert!(text.contains("Place: Freising\n"));
        assert!(text.contains("--- Weather: Ingolstadt ---"));
    }

    #[test]
    fn test_clear_prints_placeholders() {
        let mut sink = ConsoleSink::new();
        let text = sink.render(&PresentationEvent::Cleared);
        assert!(text.contains("Temperature: -- °C"));
        assert!(text.contains("Wind Speed: -- m/s"));
    }

    #[test]
    fn test_no_results_message() {
        let mut sink = ConsoleSink::new();
        let text = sink.render(&PresentationEvent::CommitFailed(LookupError::no_results("x")));
        assert_eq!(text, "! No administrative boundaries found.\n");
    }

    #[test]
    fn test_recent_list_rendering() {
        let mut sink = ConsoleSink::new();
        let text = sink.render(&PresentationEvent::RecentListChanged(vec![RecentEntry {
            name: "Tyrol, Austria".to_string(),
            latitude: 47.2,
            longitude: 11.4,
        }]));
        assert_eq!(text, "Recent: 1) Tyrol, Austria\n");
        assert_eq!(sink.recent(1).unwrap().latitude, 47.2);
    }

    #[test]
    fn test_plan_descriptions() {
        assert_eq!(
            describe_plan(&ViewFitPlan::world()),
            "fly to (20.0000, 0.0000) at zoom 2"
        );
        let bounds = BoundingBox::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(
            describe_plan(&ViewFitPlan::FitBounds {
                bounds,
                vertical_padding: 80.0
            }),
            "fit bounds [1.0, 2.0, 3.0, 4.0] with 80px vertical padding"
        );
    }
}

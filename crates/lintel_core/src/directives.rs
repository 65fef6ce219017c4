//! Suppression directive filtering.

use globset::{Glob, GlobSet, GlobSetBuilder};
use lintel_plugin::{Directive, DirectiveKind, Report};
use tracing::{debug, warn};

/// Removes reports suppressed by inline directives.
#[derive(Debug, Default)]
pub struct DirectivesFilterer {
    directives: Vec<(DirectiveKind, Option<GlobSet>)>,
}

impl DirectivesFilterer {
    /// Creates an empty filterer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds directives.
    ///
    /// A directive whose selections are not valid globs is ignored.
    pub fn add(&mut self, directives: impl IntoIterator<Item = Directive>) {
        for directive in directives {
            match build_selections(&directive.selections) {
                Ok(rules) => self.directives.push((directive.kind, rules)),
                Err(e) => warn!("Ignoring directive {:?}: {}", directive, e),
            }
        }
    }

    /// Returns true if no directive has been added.
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Returns the reports that no directive suppresses.
    pub fn filter(&self, reports: Vec<Report>) -> Vec<Report> {
        if self.directives.is_empty() {
            return reports;
        }

        let before = reports.len();
        let kept: Vec<Report> = reports
            .into_iter()
            .filter(|report| !self.suppresses(report))
            .collect();
        if kept.len() < before {
            debug!("Suppressed {} reports", before - kept.len());
        }
        kept
    }

    fn suppresses(&self, report: &Report) -> bool {
        let line = report.range.begin.line;
        self.directives.iter().any(|(kind, rules)| {
            let covers = match *kind {
                DirectiveKind::DisableFile => true,
                DirectiveKind::DisableLines { begin, end } => (begin..=end).contains(&line),
                DirectiveKind::DisableNextLine { line: directive } => {
                    directive.checked_add(1) == Some(line)
                }
            };
            covers
                && rules
                    .as_ref()
                    .is_none_or(|rules| rules.is_match(&report.about.id))
        })
    }
}

fn build_selections(selections: &[String]) -> Result<Option<GlobSet>, globset::Error> {
    if selections.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for selection in selections {
        builder.add(Glob::new(selection)?);
    }
    builder.build().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lintel_ast::{Position, Range};
    use lintel_plugin::{RuleAbout, RuleMessage};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn report(rule: &str, line: u32) -> Report {
        Report {
            about: RuleAbout::new(rule),
            message: RuleMessage::new("message").resolve(&BTreeMap::new()),
            range: Range::new(Position::new(line, 0, 0), Position::new(line, 1, 1)),
            fix: None,
            suggestions: None,
            data: None,
            dependencies: None,
        }
    }

    fn ids(reports: &[Report]) -> Vec<(String, u32)> {
        reports
            .iter()
            .map(|report| (report.about.id.clone(), report.range.begin.line))
            .collect()
    }

    fn reports() -> Vec<Report> {
        vec![
            report("no-debugger", 0),
            report("no-console", 1),
            report("no-debugger", 2),
            report("quotes", 3),
        ]
    }

    #[test]
    fn test_without_directives_everything_is_kept() {
        let filterer = DirectivesFilterer::new();
        assert!(filterer.is_empty());
        assert_eq!(filterer.filter(reports()).len(), 4);
    }

    #[test]
    fn test_disable_file_with_glob_selection() {
        let mut filterer = DirectivesFilterer::new();
        filterer.add([Directive::new(
            DirectiveKind::DisableFile,
            vec!["no-*".to_string()],
        )]);

        assert_eq!(ids(&filterer.filter(reports())), vec![("quotes".to_string(), 3)]);
    }

    #[test]
    fn test_disable_lines_without_selection() {
        let mut filterer = DirectivesFilterer::new();
        filterer.add([Directive::new(
            DirectiveKind::DisableLines { begin: 1, end: 2 },
            vec![],
        )]);

        assert_eq!(
            ids(&filterer.filter(reports())),
            vec![("no-debugger".to_string(), 0), ("quotes".to_string(), 3)]
        );
    }

    #[test]
    fn test_disable_next_line() {
        let mut filterer = DirectivesFilterer::new();
        filterer.add([Directive::new(
            DirectiveKind::DisableNextLine { line: 1 },
            vec!["no-debugger".to_string()],
        )]);

        assert_eq!(
            ids(&filterer.filter(reports())),
            vec![
                ("no-debugger".to_string(), 0),
                ("no-console".to_string(), 1),
                ("quotes".to_string(), 3)
            ]
        );
    }

    #[test]
    fn test_invalid_selection_is_ignored() {
        let mut filterer = DirectivesFilterer::new();
        filterer.add([Directive::new(
            DirectiveKind::DisableFile,
            vec!["[".to_string()],
        )]);

        assert!(filterer.is_empty());
        assert_eq!(filterer.filter(reports()).len(), 4);
    }
}

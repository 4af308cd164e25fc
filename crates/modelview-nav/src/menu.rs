use serde::{Deserialize, Serialize};

/// Distance above a section's top at which it already counts as current.
pub const SCROLL_SPY_OFFSET: f64 = 100.0;

/// A page section, identified by id, with its top offset in page pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub top: f64,
}

impl Section {
    pub fn new(id: &str, top: f64) -> Self {
        Self {
            id: id.to_string(),
            top,
        }
    }
}

/// A navigation link pointing at a section id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavLink {
    pub target: String,
    pub active: bool,
}

/// The collapsible navigation menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavMenu {
    pub open: bool,
    links: Vec<NavLink>,
}

impl NavMenu {
    /// One link per section, in page order.
    pub fn for_sections(sections: &[Section]) -> Self {
        Self {
            open: false,
            links: sections
                .iter()
                .map(|s| NavLink {
                    target: s.id.clone(),
                    active: false,
                })
                .collect(),
        }
    }

    pub fn links(&self) -> &[NavLink] {
        &self.links
    }

    pub fn active_link(&self) -> Option<&NavLink> {
        self.links.iter().find(|l| l.active)
    }

    /// Hamburger button.
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// A link click closes the menu and marks that link active.
    pub fn click_link(&mut self, target: &str) {
        self.open = false;
        self.set_active(Some(target));
    }

    /// Recompute the current section for a scroll position and mark its link
    /// active. Returns the current section id.
    pub fn scroll_spy(&mut self, sections: &[Section], scroll_y: f64) -> Option<String> {
        let current = current_section(sections, scroll_y).map(|s| s.id.clone());
        self.set_active(current.as_deref());
        current
    }

    fn set_active(&mut self, target: Option<&str>) {
        for link in &mut self.links {
            link.active = Some(link.target.as_str()) == target;
        }
        if let Some(target) = target {
            if !self.links.iter().any(|l| l.target == target) {
                log::debug!("No nav link targets section '{}'", target);
            }
        }
    }
}

/// The last section (in page order) whose top is at most
/// [`SCROLL_SPY_OFFSET`] below the scroll position.
pub fn current_section(sections: &[Section], scroll_y: f64) -> Option<&Section> {
    sections
        .iter()
        .filter(|s| scroll_y >= s.top - SCROLL_SPY_OFFSET)
        .last()
}

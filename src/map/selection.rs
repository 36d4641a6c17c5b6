use crate::observations::DocumentId;

/// External selection driving highlight and pin decisions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Selection {
    #[default]
    None,
    Parasite(String),
    Host(String),
    Document(DocumentId),
}

impl Selection {
    pub fn is_active(&self) -> bool {
        !matches!(self, Selection::None)
    }

    pub fn label(&self) -> String {
        match self {
            Selection::None => "Nothing selected".to_string(),
            Selection::Parasite(species) => format!("Parasite: {species}"),
            Selection::Host(species) => format!("Host: {species}"),
            Selection::Document(id) => format!("Paper {id}"),
        }
    }
}

/// Which marker roles are drawn for each observation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    Parasite,
    Host,
    #[default]
    Both,
}

/// Marker role; one observation may be drawn once per active role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkerRole {
    Parasite,
    Host,
}

impl DisplayMode {
    /// Active roles in draw order (hosts underneath parasites).
    pub fn roles(self) -> &'static [MarkerRole] {
        match self {
            DisplayMode::Parasite => &[MarkerRole::Parasite],
            DisplayMode::Host => &[MarkerRole::Host],
            DisplayMode::Both => &[MarkerRole::Host, MarkerRole::Parasite],
        }
    }
}

/// Selection and display mode shared between the panels and the map.
///
/// Every mutation bumps [`SelectionStore::revision`]; the renderer polls the
/// revision to know when to rebuild. Setting an unchanged value is not a change.
#[derive(Clone, Debug, Default)]
pub struct SelectionStore {
    selection: Selection,
    display_mode: DisplayMode,
    revision: u64,
}

impl SelectionStore {
    pub fn new(display_mode: DisplayMode) -> Self {
        Self {
            display_mode,
            ..Self::default()
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_selection(&mut self, selection: Selection) {
        if self.selection != selection {
            tracing::debug!("Selection changed to {}", selection.label());
            self.selection = selection;
            self.bump();
        }
    }

    pub fn clear_selection(&mut self) {
        self.set_selection(Selection::None);
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        if self.display_mode != mode {
            self.display_mode = mode;
            self.bump();
        }
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

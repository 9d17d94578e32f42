use core::fmt;

/// The state a cell carries. All cells begin [Default](Tag::Default); caller
/// edits move cells to [Blocked](Tag::Blocked), [Start](Tag::Start) or
/// [Goal](Tag::Goal); the search engine moves cells through
/// [Frontier](Tag::Frontier) and [Visited](Tag::Visited); reconstruction marks
/// the found route with [Path](Tag::Path).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tag {
    #[default]
    Default,
    /// Discovered but not yet expanded (the open set).
    Frontier,
    /// Fully expanded (the closed set).
    Visited,
    /// Impassable; excluded from neighbor derivation.
    Blocked,
    Start,
    Goal,
    /// Lies on the reconstructed route.
    Path,
}

impl Tag {
    /// Whether movement through a cell with this tag is impossible.
    pub fn blocks_movement(self) -> bool {
        self == Tag::Blocked
    }

    /// Whether this tag marks a search endpoint. Endpoint cells keep their
    /// tags for the whole lifetime of a run.
    pub fn is_endpoint(self) -> bool {
        matches!(self, Tag::Start | Tag::Goal)
    }

    /// Whether this tag was produced by a search run or a reconstruction
    /// rather than by a caller edit.
    pub fn is_exploration(self) -> bool {
        matches!(self, Tag::Frontier | Tag::Visited | Tag::Path)
    }

    /// The legal transitions of the tag state machine, shared by both
    /// algorithms. Caller edits start from [Default](Tag::Default) and any tag
    /// may be cleared back to it; the engine opens cells
    /// ([Frontier](Tag::Frontier)), closes them ([Visited](Tag::Visited)),
    /// re-opens a closed cell when a strictly better route to it is found, and
    /// reconstruction marks closed cells as [Path](Tag::Path).
    pub fn may_become(self, next: Tag) -> bool {
        use Tag::*;
        match (self, next) {
            _ if self == next => true,
            (_, Default) => true,
            (Default, _) => true,
            (Frontier, Visited) => true,
            (Visited, Frontier) => true,
            (Visited, Path) => true,
            _ => false,
        }
    }

    /// Single-character rendering used by the [Grid](crate::Grid) `Display`
    /// impl and test output.
    pub fn glyph(self) -> char {
        match self {
            Tag::Default => '.',
            Tag::Frontier => 'o',
            Tag::Visited => 'x',
            Tag::Blocked => '#',
            Tag::Start => 'S',
            Tag::Goal => 'G',
            Tag::Path => '*',
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

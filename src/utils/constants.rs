pub struct URL;

/// Just a collection of URLS
impl URL {
    pub const BASE: &'static str = "http://bert.stuy.edu";
    /// The school filter, only used after the portal reports that access is blocked
    pub const PROXY: &'static str = "http://filtr.nycboe.org:8002";
    pub const PAGES: &'static str = "pages.py";
}

/// Value of the `page` form field, which selects what the portal does with a request
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Page {
    /// Lists the assignments that can be submitted
    SubmitHomework,
    /// Lists the homework that was already submitted
    HomeworkView,
    StoreHomework,
}

impl Page {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Page::SubmitHomework => "submit_homework2",
            Page::HomeworkView => "homework_view2",
            Page::StoreHomework => "store_homework",
        }
    }
}

pub const SUBMIT_ASSIGNMENT: &str = "Submit this assignment";
pub const LATE_MARKER: &str = "- Late";
/// Downloads are written in blocks of this size
pub const CHUNK_SIZE: usize = 1024;

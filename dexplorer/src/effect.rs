use crate::filter::CategoryQuery;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadCatalog,
    /// All-or-nothing lookup of every selected category value for one apply.
    LoadCategoryMembers {
        generation: u64,
        queries: Vec<CategoryQuery>,
    },
    LoadDetails { batch: u64, ids: Vec<u32> },
    LoadSelection { token: u64, id: u32 },
    PlayCry { name: String, url: String },
}

//! Concrete grammar: per-language linearization tables

use crate::linearize::SequenceTable;
use log::warn;
use std::collections::HashMap;

/// A function as seen by one concrete grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcreteFunction {
    pub name: String,
    /// Indices into the owning grammar's sequence table, one per linearization record
    pub linearization_indices: Vec<usize>,
}

/// One way of producing a concrete category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Production {
    /// Index into the concrete grammar's function table
    pub function_index: usize,
}

/// Range of concrete category ids assigned to an abstract category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRange {
    pub start: i64,
    pub end: i64,
}

/// Language-specific linearization of an abstract grammar
#[derive(Debug, Clone, Default)]
pub struct ConcreteGrammar {
    pub id: String,
    pub language_tag: String,
    functions: Vec<ConcreteFunction>,
    by_name: HashMap<String, usize>,
    productions: HashMap<String, Vec<Production>>,
    sequences: SequenceTable,
    categories: HashMap<String, CategoryRange>,
    total_fids: Option<usize>,
}

impl ConcreteGrammar {
    pub fn new(
        id: impl Into<String>,
        language_tag: impl Into<String>,
        functions: Vec<ConcreteFunction>,
        sequences: SequenceTable,
    ) -> Self {
        // First declaration wins when a name repeats; fids stay positional either way
        let mut by_name = HashMap::new();
        for (index, function) in functions.iter().enumerate() {
            by_name.entry(function.name.clone()).or_insert(index);
        }
        ConcreteGrammar {
            id: id.into(),
            language_tag: language_tag.into(),
            functions,
            by_name,
            productions: HashMap::new(),
            sequences,
            categories: HashMap::new(),
            total_fids: None,
        }
    }

    pub fn with_productions(
        mut self,
        category: impl Into<String>,
        productions: Vec<Production>,
    ) -> Self {
        self.productions.insert(category.into(), productions);
        self
    }

    pub fn with_category_range(
        mut self,
        category: impl Into<String>,
        range: CategoryRange,
    ) -> Self {
        self.categories.insert(category.into(), range);
        self
    }

    pub fn with_total_fids(mut self, total: usize) -> Self {
        self.total_fids = Some(total);
        self
    }

    pub fn functions(&self) -> &[ConcreteFunction] {
        &self.functions
    }

    pub fn function_by_fid(&self, fid: usize) -> Option<&ConcreteFunction> {
        self.functions.get(fid)
    }

    pub fn function_by_name(&self, name: &str) -> Option<&ConcreteFunction> {
        self.by_name.get(name).map(|&index| &self.functions[index])
    }

    pub fn sequences(&self) -> &SequenceTable {
        &self.sequences
    }

    /// Productions declared for `category`, in declaration order
    pub fn productions_for(&self, category: &str) -> &[Production] {
        self.productions
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Names of the functions that realize `category`, in production order
    ///
    /// Productions pointing outside the function table are skipped.
    pub fn functions_for_category(&self, category: &str) -> Vec<&str> {
        self.productions_for(category)
            .iter()
            .filter_map(|production| match self.function_by_fid(production.function_index) {
                Some(function) => Some(function.name.as_str()),
                None => {
                    warn!(
                        "{}: production for '{}' references missing function {}",
                        self.id, category, production.function_index
                    );
                    None
                }
            })
            .collect()
    }

    pub fn category_range(&self, category: &str) -> Option<CategoryRange> {
        self.categories.get(category).copied()
    }

    pub fn total_fids(&self) -> Option<usize> {
        self.total_fids
    }
}

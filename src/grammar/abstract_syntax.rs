//! Abstract grammar: categories and the functions that produce them

use std::collections::HashMap;

/// A production rule of the abstract grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub result_category: String,
    pub argument_categories: Vec<String>,
}

impl Function {
    pub fn new(
        name: impl Into<String>,
        result_category: impl Into<String>,
        argument_categories: Vec<String>,
    ) -> Self {
        Function {
            name: name.into(),
            result_category: result_category.into(),
            argument_categories,
        }
    }

    pub fn arity(&self) -> usize {
        self.argument_categories.len()
    }
}

/// The category/function skeleton of a grammar
///
/// Functions are kept in declaration order; names are unique; a later
/// declaration with an existing name replaces the earlier one in place.
#[derive(Debug, Clone, Default)]
pub struct AbstractGrammar {
    pub name: String,
    pub start_category: String,
    functions: Vec<Function>,
    by_name: HashMap<String, usize>,
}

impl AbstractGrammar {
    pub fn new(
        name: impl Into<String>,
        start_category: impl Into<String>,
        functions: impl IntoIterator<Item = Function>,
    ) -> Self {
        let mut grammar = AbstractGrammar {
            name: name.into(),
            start_category: start_category.into(),
            functions: Vec::new(),
            by_name: HashMap::new(),
        };
        for function in functions {
            grammar.insert(function);
        }
        grammar
    }

    fn insert(&mut self, function: Function) {
        match self.by_name.get(&function.name) {
            Some(&index) => self.functions[index] = function,
            None => {
                self.by_name
                    .insert(function.name.clone(), self.functions.len());
                self.functions.push(function);
            }
        }
    }

    /// All functions, in declaration order
    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// Look up a function by name
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.by_name.get(name).map(|&index| &self.functions[index])
    }

    /// Names of the functions whose result is `category`, in declaration order
    pub fn functions_for_category(&self, category: &str) -> Vec<&str> {
        self.functions
            .iter()
            .filter(|f| f.result_category == category)
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Whether any function produces `category`
    pub fn has_functions(&self, category: &str) -> bool {
        self.functions.iter().any(|f| f.result_category == category)
    }

    /// Every category mentioned by the grammar, in first-seen order
    ///
    /// The start category comes first, then result and argument categories
    /// as they appear in the function declarations.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        let mentioned = std::iter::once(self.start_category.as_str()).chain(
            self.functions.iter().flat_map(|f| {
                std::iter::once(f.result_category.as_str())
                    .chain(f.argument_categories.iter().map(String::as_str))
            }),
        );
        for category in mentioned {
            if !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }
}

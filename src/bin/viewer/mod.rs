pub mod alternatives;
pub mod app;
pub mod model;
pub mod treeviewer;
pub mod ui;
#[allow(clippy::module_inception)]
pub mod viewer;
pub mod viewer_main;

#[cfg(test)]
pub mod tests;

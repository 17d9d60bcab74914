pub mod graph_explorer;
pub mod info_panel;
pub mod network_view;
pub mod search_bar;
pub mod simulation;

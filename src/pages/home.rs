use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::Title;

use crate::api::{self, Filters, RequestSequence};
use crate::components::graph_explorer::{GraphCanvas, GraphData, build};
use crate::components::info_panel::{InfoPanel, PanelView};
use crate::components::search_bar::SearchBar;

#[derive(Clone, Debug, PartialEq)]
enum GraphLoad {
	Loading,
	Ready(GraphData),
	Failed,
}

/// The explorer page: force-directed graph, search box and info panel.
#[component]
pub fn Home() -> impl IntoView {
	let filters = RwSignal::new(Filters::default());
	let graph = RwSignal::new(GraphLoad::Loading);
	let panel = RwSignal::new(PanelView::Empty);
	let sequence = RequestSequence::default();

	// the graph is rebuilt wholesale on load and on every filter change
	Effect::new(move |_| {
		let current = filters.get();
		graph.set(GraphLoad::Loading);
		spawn_local(async move {
			match api::fetch_characters(&current).await {
				Ok(records) => graph.set(GraphLoad::Ready(build(&records))),
				Err(err) => {
					log::error!("Error loading graph data: {err}");
					graph.set(GraphLoad::Failed);
				}
			}
		});
	});

	let detail_sequence = sequence.clone();
	let show_character = Callback::new(move |id: String| {
		let ticket = detail_sequence.begin();
		spawn_local(async move {
			let result = api::fetch_character(&id).await;
			if ticket.is_current() {
				panel.set(PanelView::from_detail(result));
			} else {
				log::debug!("Discarding stale character response for {id}");
			}
		});
	});

	let run_search = Callback::new(move |query: String| {
		let query = query.trim().to_string();
		if query.is_empty() {
			return;
		}
		let ticket = sequence.begin();
		let current = filters.get_untracked();
		spawn_local(async move {
			let result = api::search_characters(&query, &current).await;
			if ticket.is_current() {
				panel.set(PanelView::from_search(&query, result));
			} else {
				log::debug!("Discarding stale search response for \"{query}\"");
			}
		});
	});

	view! {
		<Title text="Hanzi Explorer" />
		<main class="explorer">
			<header style="display: flex; gap: 16px; align-items: baseline;">
				<h1>"Hanzi Explorer"</h1>
				<a href="/graph">"Network overview"</a>
			</header>
			<SearchBar filters=filters on_search=run_search />
			<div class="explorer-layout" style="display: flex; gap: 16px;">
				<div id="graph-container" style="flex: 1; height: 600px;">
					{move || match graph.get() {
						GraphLoad::Loading => {
							view! { <p>"Loading characters..."</p> }.into_any()
						}
						GraphLoad::Failed => {
							view! {
								<div class="alert alert-danger">
									"Error loading graph data. Please try again later."
								</div>
							}
								.into_any()
						}
						GraphLoad::Ready(data) => {
							view! {
								<GraphCanvas
									data=data
									on_character_select=show_character
									on_attribute_select=run_search
								/>
							}
								.into_any()
						}
					}}
				</div>
				<InfoPanel content=panel on_character_select=show_character />
			</div>
		</main>
	}
}

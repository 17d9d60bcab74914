//! The side panel a character detail record or search result set renders
//! into. Any failure collapses to one generic message per query type.

use leptos::prelude::*;

use crate::api::{ApiError, CharacterRecord, number_or_na};

pub const DETAIL_ERROR: &str = "Error loading character data";
pub const SEARCH_ERROR: &str = "Error searching characters";
pub const NO_RESULTS: &str = "No characters found matching your search.";

#[derive(Clone, Debug, PartialEq)]
pub enum PanelView {
	Empty,
	Detail(CharacterRecord),
	Results {
		query: String,
		results: Vec<CharacterRecord>,
	},
	Error(&'static str),
}

impl PanelView {
	pub fn from_detail(result: Result<CharacterRecord, ApiError>) -> Self {
		match result {
			Ok(record) => PanelView::Detail(record),
			Err(err) => {
				log::error!("Error fetching character data: {err}");
				PanelView::Error(DETAIL_ERROR)
			}
		}
	}

	pub fn from_search(query: &str, result: Result<Vec<CharacterRecord>, ApiError>) -> Self {
		match result {
			Ok(results) => PanelView::Results {
				query: query.to_string(),
				results,
			},
			Err(err) => {
				log::error!("Error searching characters: {err}");
				PanelView::Error(SEARCH_ERROR)
			}
		}
	}
}

fn join_or(items: &[String], fallback: &str) -> String {
	if items.is_empty() {
		fallback.to_string()
	} else {
		items.join(", ")
	}
}

fn result_line(record: &CharacterRecord) -> String {
	format!(
		"{} - {} (Vol {}, Ch {})",
		record.character,
		join_or(&record.keywords, "No keywords"),
		number_or_na(record.volume),
		number_or_na(record.chapter),
	)
}

#[component]
pub fn InfoPanel(
	#[prop(into)] content: Signal<PanelView>,
	#[prop(into)] on_character_select: Callback<String>,
) -> impl IntoView {
	view! {
		<aside class="info-panel">
			<h2>"Character Information"</h2>
			<div class="info-content">
				{move || match content.get() {
					PanelView::Empty => {
						view! { <p>"Click a node to see details"</p> }.into_any()
					}
					PanelView::Detail(record) => detail_view(record).into_any(),
					PanelView::Results { query, results } => {
						results_view(query, results, on_character_select)
					}
					PanelView::Error(message) => view! { <p>{message}</p> }.into_any(),
				}}
			</div>
		</aside>
	}
}

fn detail_view(record: CharacterRecord) -> impl IntoView {
	let detail_href = format!("/character/{}", record.character);
	let story = record
		.story
		.clone()
		.unwrap_or_else(|| "No story available".to_string());
	view! {
		<h3>{record.character.clone()}</h3>
		<p><strong>"Frame: "</strong>{number_or_na(record.frame_number)}</p>
		<p><strong>"Volume: "</strong>{number_or_na(record.volume)}</p>
		<p><strong>"Chapter: "</strong>{number_or_na(record.chapter)}</p>
		<p><strong>"Keywords: "</strong>{join_or(&record.keywords, "None")}</p>
		<p><strong>"Primitive Elements: "</strong>{join_or(&record.primitive_elements, "None")}</p>
		<p><strong>"Primitive Meanings: "</strong>{join_or(&record.primitive_meanings, "None")}</p>
		<p><strong>"Story: "</strong>{story}</p>
		<a href=detail_href class="detail-link">"View Full Details"</a>
	}
}

fn results_view(
	query: String,
	results: Vec<CharacterRecord>,
	on_character_select: Callback<String>,
) -> AnyView {
	if results.is_empty() {
		return view! { <p>{NO_RESULTS}</p> }.into_any();
	}
	let heading = format!("Search Results for \"{query}\"");
	view! {
		<h3>{heading}</h3>
		<ul>
			{results
				.iter()
				.map(|record| {
					let id = record.character.clone();
					let line = result_line(record);
					view! {
						<li>
							<a
								href="#"
								on:click=move |ev| {
									ev.prevent_default();
									on_character_select.run(id.clone());
								}
							>
								{line}
							</a>
						</li>
					}
				})
				.collect_view()}
		</ul>
	}
	.into_any()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(character: &str) -> CharacterRecord {
		CharacterRecord {
			character: character.to_string(),
			..CharacterRecord::default()
		}
	}

	#[test]
	fn detail_failure_yields_designated_error() {
		let view = PanelView::from_detail(Err(ApiError::Status(500)));
		assert_eq!(view, PanelView::Error(DETAIL_ERROR));
	}

	#[test]
	fn detail_success_yields_record() {
		let view = PanelView::from_detail(Ok(record("A")));
		assert_eq!(view, PanelView::Detail(record("A")));
	}

	#[test]
	fn search_failure_yields_designated_error() {
		let view = PanelView::from_search("k1", Err(ApiError::Network("offline".to_string())));
		assert_eq!(view, PanelView::Error(SEARCH_ERROR));
	}

	#[test]
	fn empty_search_keeps_query_and_no_results() {
		let view = PanelView::from_search("nothing", Ok(vec![]));
		assert_eq!(
			view,
			PanelView::Results {
				query: "nothing".to_string(),
				results: vec![],
			}
		);
	}

	#[test]
	fn result_line_falls_back_per_field() {
		assert_eq!(result_line(&record("A")), "A - No keywords (Vol N/A, Ch N/A)");

		let full = CharacterRecord {
			character: "水".to_string(),
			keywords: vec!["water".to_string(), "liquid".to_string()],
			volume: Some(1),
			chapter: Some(3),
			..CharacterRecord::default()
		};
		assert_eq!(result_line(&full), "水 - water, liquid (Vol 1, Ch 3)");
	}

	#[test]
	fn join_or_uses_fallback_only_when_empty() {
		assert_eq!(join_or(&[], "None"), "None");
		assert_eq!(join_or(&["a".to_string(), "b".to_string()], "None"), "a, b");
	}
}

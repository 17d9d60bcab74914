use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{self, Filters, Metadata};

/// Search input plus the volume/chapter filter selects. Submitting runs
/// `on_search` with the input's current value; the filters signal is
/// shared with the page so every query picks it up.
#[component]
pub fn SearchBar(
	filters: RwSignal<Filters>,
	#[prop(into)] on_search: Callback<String>,
) -> impl IntoView {
	let query = RwSignal::new(String::new());
	let metadata = RwSignal::new(Metadata::default());

	spawn_local(async move {
		match api::fetch_metadata().await {
			Ok(loaded) => metadata.set(loaded),
			Err(err) => log::error!("Error fetching metadata: {err}"),
		}
	});

	let submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		on_search.run(query.get());
	};

	let on_volume_change = move |ev: leptos::ev::Event| {
		let value = event_target_value(&ev);
		filters.update(|f| {
			f.volume = value.parse().ok();
			f.chapter = None;
		});
	};

	let on_chapter_change = move |ev: leptos::ev::Event| {
		let value = event_target_value(&ev);
		filters.update(|f| f.chapter = value.parse().ok());
	};

	let chapter_options = move || {
		let selected = filters.get().volume;
		metadata
			.get()
			.volumes
			.into_iter()
			.filter(|volume| Some(volume.number) == selected)
			.flat_map(|volume| volume.chapters)
			.map(|chapter| {
				view! { <option value=chapter.number.to_string()>{chapter.title}</option> }
			})
			.collect_view()
	};

	view! {
		<div class="search-bar" style="display: flex; gap: 8px; align-items: center;">
			<form on:submit=submit>
				<input
					type="text"
					id="search"
					placeholder="Search characters, keywords, primitives"
					prop:value=query
					on:input=move |ev| query.set(event_target_value(&ev))
				/>
				<button type="submit">"Search"</button>
			</form>
			<label>
				"Volume "
				<select on:change=on_volume_change>
					<option value="">"All"</option>
					{move || {
						metadata
							.get()
							.volumes
							.into_iter()
							.map(|volume| {
								view! {
									<option value=volume.number.to_string()>{volume.title}</option>
								}
							})
							.collect_view()
					}}
				</select>
			</label>
			<label>
				"Chapter "
				<select on:change=on_chapter_change>
					<option value="">"All"</option>
					{chapter_options}
				</select>
			</label>
		</div>
	}
}

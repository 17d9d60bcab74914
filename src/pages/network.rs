use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::Title;

use crate::components::network_view::{NetworkCanvas, NetworkData, data};

#[derive(Clone, Debug, PartialEq)]
enum NetworkLoad {
	Loading,
	Ready(NetworkData),
	Failed,
}

/// The network overview page, fed by the pre-shaped graph payload.
#[component]
pub fn GraphPage() -> impl IntoView {
	let load = RwSignal::new(NetworkLoad::Loading);

	spawn_local(async move {
		match data::load().await {
			Ok(network) => load.set(NetworkLoad::Ready(network)),
			Err(err) => {
				log::error!("Error loading graph data: {err}");
				load.set(NetworkLoad::Failed);
			}
		}
	});

	view! {
		<Title text="Character Graph" />
		<main>
			<header style="display: flex; gap: 16px; align-items: baseline;">
				<h1>"Character Graph"</h1>
				<a href="/">"Back to the explorer"</a>
			</header>
			<div id="graph-container" style="height: 800px;">
				{move || match load.get() {
					NetworkLoad::Loading => view! { <p>"Loading graph..."</p> }.into_any(),
					NetworkLoad::Failed => {
						view! {
							<div class="alert alert-danger">
								"Error loading graph data. Please try again later."
							</div>
						}
							.into_any()
					}
					NetworkLoad::Ready(network) => {
						view! { <NetworkCanvas data=network /> }.into_any()
					}
				}}
			</div>
		</main>
	}
}

use leptos::prelude::*;

/// 404 fallback.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<main>
			<h1>"Page not found"</h1>
			<p>
				<a href="/">"Return to the explorer"</a>
			</p>
		</main>
	}
}

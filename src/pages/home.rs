use leptos::prelude::*;
use leptos::task::spawn_local;
use log::info;

use crate::components::ownership_graph::OwnershipGraphCanvas;
use crate::data::{self, DataError};
use crate::graph::OwnershipGraph;

/// Default Home Page: fetches the ownership dataset once, builds the graph,
/// and hands it to the canvas. Fetch or decode failures surface through the
/// error boundary instead of leaving a blank page.
#[component]
pub fn Home() -> impl IntoView {
	let (graph, set_graph) = signal(None::<Result<OwnershipGraph, DataError>>);

	spawn_local(async move {
		let result = data::fetch_records(data::DATA_URL).await.map(|records| {
			info!("Loaded {} ownership records", records.len());
			OwnershipGraph::from_records(&records)
		});
		set_graph.set(Some(result));
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				{move || match graph.get() {
					None => view! { <p class="loading">"Loading ownership data..."</p> }.into_any(),
					Some(result) => result
						.map(|g| view! { <OwnershipGraphCanvas graph=g fullscreen=true /> })
						.into_any(),
				}}
				<div class="graph-overlay">
					<h1>"Business Ownership Graph"</h1>
					<p class="subtitle">
						"Drag a node to pin it in place. Scroll to zoom. Drag the background to pan."
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}

mod api;
mod components;

use components::match_form::MatchForm;
use yew::prelude::*;

#[function_component(App)]
fn app() -> Html {
    html! {
        <div class="app-container">
            <header class="app-header">
                <h1>{ "AI Casting Director" }</h1>
                <p class="subtitle">
                    { "Describe your character or story, and we'll find the perfect actor to bring them to life." }
                </p>
            </header>
            <main class="main-stage">
                <MatchForm />
            </main>
        </div>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}

use crate::api;
use crate::components::results::ResultsPanel;
use shared::models::MatchOutcome;
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

const PLACEHOLDER: &str = "Example: A witty, middle-aged detective with a troubled past who uses \
humor to cope with the darkness of their job. Think sharp dialogue, world-weary but hopeful...";

#[function_component(MatchForm)]
pub fn match_form() -> Html {
    let loading = use_state(|| false);
    let input = use_state(String::new);
    let result = use_state(|| None::<MatchOutcome>);

    let on_input = {
        let input = input.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(textarea) = e.target_dyn_into::<HtmlTextAreaElement>() {
                input.set(textarea.value());
            }
        })
    };

    let on_submit = {
        let loading = loading.clone();
        let input = input.clone();
        let result = result.clone();
        Callback::from(move |_: MouseEvent| {
            let description = (*input).clone();
            if description.trim().is_empty() {
                return;
            }

            loading.set(true);
            let loading = loading.clone();
            let result = result.clone();
            yew::platform::spawn_local(async move {
                match api::match_actor(description).await {
                    Ok(outcome) => result.set(Some(outcome)),
                    Err(e) => tracing::error!("Error fetching actor match: {:?}", e),
                }
                loading.set(false);
            });
        })
    };

    let submit_disabled = input.trim().is_empty() || *loading;

    html! {
        <div class="match-form">
            <div class="form-card">
                <label for="character-description">{ "Character Description" }</label>
                <textarea
                    id="character-description"
                    rows="8"
                    placeholder={PLACEHOLDER}
                    value={(*input).clone()}
                    oninput={on_input}
                    disabled={*loading}
                />
                <button onclick={on_submit} disabled={submit_disabled}>
                    { "Find Perfect Actor" }
                </button>
            </div>

            if *loading {
                <div class="loading-overlay">
                    <div class="spinner" />
                    <p>{ "Consulting the casting director..." }</p>
                </div>
            }

            if let Some(outcome) = (*result).clone() {
                <ResultsPanel {outcome} />
            }
        </div>
    }
}

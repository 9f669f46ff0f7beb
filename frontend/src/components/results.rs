use shared::models::{ActorMatch, MatchOutcome};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ResultsPanelProps {
    pub outcome: MatchOutcome,
}

/// Renders the last answer from the backend: either the recommendation
/// cards or the error payload.
#[function_component(ResultsPanel)]
pub fn results_panel(props: &ResultsPanelProps) -> Html {
    match &props.outcome {
        MatchOutcome::Success(response) => html! {
            <div class="results">
                <h2>{ "Recommended actors" }</h2>
                <p class="described-as">{ format!("For: {}", response.character_description) }</p>
                <div class="actor-list">
                    { for response.recommendations.iter().map(|actor| html! {
                        <ActorCard actor={actor.clone()} />
                    }) }
                </div>
            </div>
        },
        MatchOutcome::Failure(failure) => html! {
            <div class="results error-box">
                <h2>{ "Something went wrong" }</h2>
                <p>{ &failure.error }</p>
                if let Some(message) = &failure.message {
                    <p class="error-detail">{ message }</p>
                }
            </div>
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct ActorCardProps {
    pub actor: ActorMatch,
}

#[function_component(ActorCard)]
pub fn actor_card(props: &ActorCardProps) -> Html {
    let actor = &props.actor;

    html! {
        <div class="actor-card">
            <div class="actor-heading">
                if let Some(photo) = &actor.photo_url {
                    <img class="actor-photo" src={photo.clone()} alt={actor.name.clone()} />
                }
                <h3>
                    if let Some(imdb) = &actor.imdb_url {
                        <a href={imdb.clone()} target="_blank" rel="noopener noreferrer">
                            { &actor.name }
                        </a>
                    } else {
                        { &actor.name }
                    }
                </h3>
            </div>
            <p class="reasoning">{ &actor.reasoning }</p>
            if !actor.notable_roles.is_empty() {
                <ul class="notable-roles">
                    { for actor.notable_roles.iter().map(|role| html! { <li>{ role }</li> }) }
                </ul>
            }
        </div>
    }
}

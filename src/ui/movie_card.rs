use iced::widget::{column, container, row, text};
use iced::{Element, Length};
use std::path::PathBuf;

use super::{poster, MUTED};
use crate::state::data::Movie;
use crate::Message;

const CARD_WIDTH: f32 = 220.0;
const POSTER_HEIGHT: f32 = 330.0;

/// One result card: poster, title, then "★ rating • language • year"
pub fn movie_card<'a>(movie: &'a Movie, poster_path: Option<&PathBuf>) -> Element<'a, Message> {
    let details = row![
        text(format!("★ {}", movie.rating_label())).size(14),
        text("•").size(14).color(MUTED),
        text(movie.original_language.as_str()).size(14).color(MUTED),
        text("•").size(14).color(MUTED),
        text(movie.year_label()).size(14).color(MUTED),
    ]
    .spacing(6);

    container(
        column![
            poster(poster_path, CARD_WIDTH - 20.0, POSTER_HEIGHT),
            text(movie.title.as_str()).size(16),
            details,
        ]
        .spacing(8),
    )
    .padding(10)
    .width(Length::Fixed(CARD_WIDTH))
    .style(container::rounded_box)
    .into()
}

/// View helpers for the main window
pub mod movie_card;
pub mod trending;

use iced::widget::{column, container, image, text, text_input, Column, Row};
use iced::{Alignment, Color, Element, Length};
use std::path::PathBuf;

use crate::state::data::Fetch;
use crate::Message;

pub const ACCENT: Color = Color::from_rgb(0.67, 0.55, 1.0);
pub const ERROR: Color = Color::from_rgb(0.94, 0.27, 0.27);
pub const MUTED: Color = Color::from_rgb(0.65, 0.65, 0.75);

/// Hero header with the search field
pub fn header(input: &str) -> Element<'_, Message> {
    let search = text_input("Search through thousands of movies", input)
        .on_input(Message::SearchChanged)
        .padding(12)
        .size(18)
        .width(Length::Fixed(560.0));

    column![
        text("Find Movies You'll Enjoy Without the Hassle").size(40),
        search,
    ]
    .spacing(24)
    .align_x(Alignment::Center)
    .width(Length::Fill)
    .into()
}

/// Shared loading / error / content switch for both lists
pub fn fetch_view<'a, T>(
    fetch: &'a Fetch<T>,
    ready: impl FnOnce(&'a T) -> Element<'a, Message>,
) -> Element<'a, Message> {
    match fetch {
        Fetch::Loading => text("Loading...").size(16).into(),
        Fetch::Failed(message) => text(*message).size(16).color(ERROR).into(),
        Fetch::Ready(value) => ready(value),
    }
}

/// Poster from the on-disk cache, or a placeholder while it loads
pub fn poster<'a>(path: Option<&PathBuf>, width: f32, height: f32) -> Element<'a, Message> {
    match path {
        Some(path) => image(image::Handle::from_path(path))
            .width(Length::Fixed(width))
            .height(Length::Fixed(height))
            .into(),
        None => container(text("No poster").size(14).color(MUTED))
            .width(Length::Fixed(width))
            .height(Length::Fixed(height))
            .center_x(Length::Fixed(width))
            .center_y(Length::Fixed(height))
            .into(),
    }
}

/// Lay out elements in rows of `per_row`
pub fn grid<'a>(items: Vec<Element<'a, Message>>, per_row: usize) -> Element<'a, Message> {
    let mut rows: Vec<Element<'a, Message>> = Vec::new();
    let mut items = items.into_iter().peekable();

    while items.peek().is_some() {
        let chunk: Vec<Element<'a, Message>> = items.by_ref().take(per_row).collect();
        rows.push(Row::with_children(chunk).spacing(20).into());
    }

    Column::with_children(rows).spacing(20).into()
}

use iced::widget::{column, row, text, Row};
use iced::{Alignment, Element};

use super::{poster, ACCENT};
use crate::poster::PosterIndex;
use crate::state::data::TrendingEntry;
use crate::Message;

/// Numbered strip of the most searched terms' posters, rank starting at 1
pub fn trending_strip<'a>(
    entries: &'a [TrendingEntry],
    posters: &PosterIndex,
) -> Element<'a, Message> {
    if entries.is_empty() {
        return text("Nothing trending yet. Search for something!").size(14).into();
    }

    let items = entries.iter().enumerate().map(|(index, entry)| -> Element<'a, Message> {
        let path = posters.get(&entry.poster_url);

        row![
            text((index + 1).to_string()).size(72).color(ACCENT),
            column![
                poster(path, 110.0, 165.0),
                text(entry.search_term.as_str()).size(13),
            ]
            .spacing(4),
        ]
        .spacing(4)
        .align_y(Alignment::End)
        .into()
    });

    Row::with_children(items).spacing(24).into()
}

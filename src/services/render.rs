// src/services/render.rs

//! RSS and Atom rendering of projected feed entries.

use atom_syndication::{
    ContentBuilder, Entry, EntryBuilder, FeedBuilder, LinkBuilder, PersonBuilder, Text,
};
use chrono::{DateTime, FixedOffset, Utc};
use rss::{ChannelBuilder, GuidBuilder, Item, ItemBuilder};

use crate::error::{AppError, Result};
use crate::models::FeedConfig;
use crate::pipeline::{FeedEntry, FeedFormat};

/// Serializes feed entries under the configured feed identity.
pub struct FeedRenderer<'a> {
    config: &'a FeedConfig,
}

impl<'a> FeedRenderer<'a> {
    pub fn new(config: &'a FeedConfig) -> Self {
        Self { config }
    }

    /// Render entries, in the order given, as a complete feed document.
    pub fn render(&self, format: FeedFormat, entries: &[FeedEntry]) -> Result<String> {
        let bytes = match format {
            FeedFormat::Rss => self.render_rss(entries)?,
            FeedFormat::Atom => self.render_atom(entries)?,
        };
        String::from_utf8(bytes).map_err(AppError::feed)
    }

    fn render_rss(&self, entries: &[FeedEntry]) -> Result<Vec<u8>> {
        let items: Vec<Item> = entries
            .iter()
            .map(|entry| {
                ItemBuilder::default()
                    .title(Some(entry.title.clone()))
                    .link(Some(entry.id.clone()))
                    .description(Some(entry.title.clone()))
                    .guid(Some(
                        GuidBuilder::default()
                            .value(entry.id.clone())
                            .permalink(true)
                            .build(),
                    ))
                    .pub_date(Some(entry.published.to_rfc2822()))
                    .build()
            })
            .collect();

        let managing_editor = self
            .config
            .author_email
            .as_ref()
            .map(|email| format!("{} ({})", email, self.config.author_name));

        let channel = ChannelBuilder::default()
            .title(self.config.title.clone())
            .link(self.config.id.clone())
            .description(self.config.subtitle.clone())
            .language(Some(self.config.language.clone()))
            .managing_editor(managing_editor)
            .last_build_date(Some(self.updated(entries).to_rfc2822()))
            .items(items)
            .build();

        channel.write_to(Vec::new()).map_err(AppError::feed)
    }

    fn render_atom(&self, entries: &[FeedEntry]) -> Result<Vec<u8>> {
        let atom_entries: Vec<Entry> = entries
            .iter()
            .map(|entry| {
                EntryBuilder::default()
                    .title(Text::plain(entry.title.clone()))
                    .id(entry.id.clone())
                    .links(vec![
                        LinkBuilder::default()
                            .href(entry.id.clone())
                            .rel("alternate")
                            .build(),
                    ])
                    .content(Some(
                        ContentBuilder::default()
                            .value(Some(entry.title.clone()))
                            .content_type(Some("text".to_string()))
                            .build(),
                    ))
                    .published(Some(entry.published))
                    .updated(entry.published)
                    .build()
            })
            .collect();

        let author = PersonBuilder::default()
            .name(self.config.author_name.clone())
            .email(self.config.author_email.clone())
            .uri(self.config.author_uri.clone())
            .build();

        let feed = FeedBuilder::default()
            .title(Text::plain(self.config.title.clone()))
            .id(self.config.id.clone())
            .updated(self.updated(entries))
            .authors(vec![author])
            .links(vec![
                LinkBuilder::default()
                    .href(self.config.id.clone())
                    .rel("self")
                    .build(),
            ])
            .subtitle(Some(Text::plain(self.config.subtitle.clone())))
            .lang(Some(self.config.language.clone()))
            .entries(atom_entries)
            .build();

        feed.write_to(Vec::new()).map_err(AppError::feed)
    }

    /// Newest entry timestamp, or now for an empty feed.
    fn updated(&self, entries: &[FeedEntry]) -> DateTime<FixedOffset> {
        entries
            .iter()
            .map(|entry| entry.published)
            .max()
            .unwrap_or_else(|| Utc::now().fixed_offset())
    }
}

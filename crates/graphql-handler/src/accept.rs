// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::cmp::Ordering;

use mime::Mime;

/// The media ranges of an `Accept` header, ordered by descending quality.
#[derive(Debug, Clone, Default)]
pub struct AcceptedTypes {
    ranges: Vec<MediaRange>,
}

#[derive(Debug, Clone)]
struct MediaRange {
    mime: Mime,
    quality: f32,
}

impl AcceptedTypes {
    /// Parse an `Accept` header value. Unparsable ranges are skipped.
    pub fn parse(header: Option<&str>) -> Self {
        let mut ranges: Vec<MediaRange> = header
            .into_iter()
            .flat_map(|header| header.split(','))
            .filter_map(|range| range.trim().parse::<Mime>().ok())
            .map(|mime| {
                let quality = mime
                    .get_param("q")
                    .and_then(|q| q.as_str().parse::<f32>().ok())
                    .unwrap_or(1.0)
                    .clamp(0.0, 1.0);
                MediaRange { mime, quality }
            })
            .collect();

        // stable, so equally weighted ranges keep the client's order
        ranges.sort_by(|a, b| b.quality.partial_cmp(&a.quality).unwrap_or(Ordering::Equal));

        Self { ranges }
    }

    /// Content types (without parameters) in order of preference.
    pub fn content_types(&self) -> impl Iterator<Item = &str> {
        self.ranges.iter().map(|range| range.mime.essence_str())
    }

    /// The quality the client assigns to `offered`, using the most specific matching range.
    fn quality(&self, offered: &Mime) -> f32 {
        self.ranges
            .iter()
            .filter_map(|range| {
                let specificity = if range.mime.type_() == mime::STAR {
                    0
                } else if range.mime.type_() != offered.type_() {
                    return None;
                } else if range.mime.subtype() == mime::STAR {
                    1
                } else if range.mime.subtype() == offered.subtype() {
                    2
                } else {
                    return None;
                };
                Some((specificity, range.quality))
            })
            // `max_by_key` returns the last maximum, so reverse to favor the first
            .rev()
            .max_by_key(|(specificity, _)| *specificity)
            .map(|(_, quality)| quality)
            .unwrap_or(0.0)
    }

    /// Whether the client wants HTML more than JSON (a browser navigation rather than an API call).
    ///
    /// Ties, including a missing `Accept` header, go to JSON.
    pub fn prefers_html(&self) -> bool {
        self.quality(&mime::TEXT_HTML) > self.quality(&mime::APPLICATION_JSON)
    }
}

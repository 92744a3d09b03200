//! Row height calculation
//!
//! Heights for a batch are calculated concurrently and joined before the
//! batch reaches the stream. Editorial cards also prefetch their images in
//! the same join.

use futures::future::join_all;
use unicode_width::UnicodeWidthStr;

use super::cell_item::{CellItem, CellUid};
use super::kind::CellKind;
use crate::config::Config;
use crate::models::{Editorial, Payload, Region, Shared};

/// Measures one row
#[allow(async_fn_in_trait)]
pub trait SizeCalculator {
    /// Height of `item` in a stream `width` wide split into `column_count`
    /// columns; `None` when the row cannot be measured
    async fn height(&self, item: &CellItem, width: f32, column_count: usize) -> Option<f32>;
}

/// Loads editorial images ahead of display
#[allow(async_fn_in_trait)]
pub trait EditorialPrefetcher {
    /// Fetch the card's image and mark it ready
    async fn prefetch(&self, editorial: &Shared<Editorial>);
}

/// Prefetcher that only marks cards ready
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrefetch;

impl EditorialPrefetcher for NoPrefetch {
    async fn prefetch(&self, editorial: &Shared<Editorial>) {
        editorial.borrow_mut().image_ready = true;
    }
}

/// Measure every item and prefetch every editorial; returns once all of
/// them have finished
pub async fn measure<'a, C, P>(
    items: impl IntoIterator<Item = &'a CellItem>,
    calculator: &C,
    prefetcher: &P,
    width: f32,
    column_count: usize,
) -> Vec<(CellUid, f32)>
where
    C: SizeCalculator,
    P: EditorialPrefetcher,
{
    let items: Vec<&CellItem> = items.into_iter().collect();
    let heights = join_all(items.iter().map(|item| async move {
        calculator
            .height(item, width, column_count)
            .await
            .map(|height| (item.uid(), height))
    }));

    let editorials: Vec<Shared<Editorial>> = items
        .iter()
        .filter_map(|item| match item.payload() {
            Some(Payload::Editorial(editorial)) => Some(editorial.clone()),
            _ => None,
        })
        .collect();
    let prefetch = join_all(editorials.iter().map(|e| prefetcher.prefetch(e)));

    let (heights, _) = futures::join!(heights, prefetch);
    heights.into_iter().flatten().collect()
}

/// Measure a batch and store each height for `column_count`
pub async fn calculate_cell_items<C, P>(
    items: &mut [CellItem],
    calculator: &C,
    prefetcher: &P,
    width: f32,
    column_count: usize,
) where
    C: SizeCalculator,
    P: EditorialPrefetcher,
{
    let heights = measure(items.iter(), calculator, prefetcher, width, column_count).await;
    for (uid, height) in heights {
        if let Some(item) = items.iter_mut().find(|item| item.uid() == uid) {
            item.heights.set(column_count, height);
        }
    }
}

/// Width of one column once gutters are taken out
pub fn column_width(width: f32, gutter: f32, column_count: usize) -> f32 {
    let columns = column_count.max(1);
    let gutters = gutter * (columns - 1) as f32;
    ((width - gutters) / columns as f32).max(0.0)
}

/// Remove markup and decode entities
pub fn strip_html(html: &str) -> String {
    let text = html
        .replace("<br>", "\n")
        .replace("<br/>", "\n")
        .replace("<br />", "\n")
        .replace("</p><p>", "\n\n");

    let text = regex_lite::Regex::new(r"<[^>]+>")
        .map(|re| re.replace_all(&text, "").to_string())
        .unwrap_or(text);

    html_escape::decode_html_entities(&text).trim().to_string()
}

const TEXT_PADDING: f32 = 15.0;

/// Estimates heights from wrapped text and image dimensions
#[derive(Debug, Clone)]
pub struct TextSizeCalculator {
    gutter: f32,
    line_height: f32,
    glyph_width: f32,
}

impl Default for TextSizeCalculator {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl TextSizeCalculator {
    /// Build from layout settings
    pub const fn from_config(config: &Config) -> Self {
        Self {
            gutter: config.gutter,
            line_height: config.line_height,
            glyph_width: config.glyph_width,
        }
    }

    /// Height of wrapped HTML text
    pub fn text_height(&self, html: &str, width: f32) -> f32 {
        let text = strip_html(html);
        if text.is_empty() {
            return TEXT_PADDING * 2.0;
        }
        let columns = ((width / self.glyph_width) as usize).max(1);
        let lines: usize = textwrap::wrap(&text, columns)
            .iter()
            .map(|line| line.width().div_ceil(columns).max(1))
            .sum();
        lines as f32 * self.line_height + TEXT_PADDING * 2.0
    }

    fn region_height(&self, region: &Region, width: f32) -> f32 {
        match region {
            Region::Text { content } => self.text_height(content, width),
            Region::Image {
                width: Some(w),
                height: Some(h),
                ..
            } if *w > 0 => width * *h as f32 / *w as f32,
            Region::Image { .. } => width,
            Region::Embed { .. } => width * 9.0 / 16.0,
        }
    }

    fn measure_item(&self, item: &CellItem, width: f32) -> Option<f32> {
        let kind = item.kind();
        if let Some(height) = fixed_height(kind) {
            return Some(height);
        }
        let payload = item.payload()?;
        match kind {
            CellKind::Text(index) | CellKind::Image(index) | CellKind::Embed(index) => {
                let post = payload.as_post()?.borrow();
                post.content
                    .get(index)
                    .map(|region| self.region_height(region, width))
            }
            CellKind::CommentBody => {
                let comment = payload.as_comment()?.borrow();
                Some(self.text_height(&comment.content, width))
            }
            CellKind::Notification => match payload {
                Payload::Notification(n) => {
                    Some(self.text_height(&n.borrow().text, width) + self.line_height)
                }
                _ => None,
            },
            _ => None,
        }
    }
}

impl SizeCalculator for TextSizeCalculator {
    async fn height(&self, item: &CellItem, width: f32, column_count: usize) -> Option<f32> {
        let width = column_width(width, self.gutter, column_count);
        if item.kind() == CellKind::Editorial {
            return Some(width);
        }
        self.measure_item(item, width)
    }
}

/// Rows whose height does not depend on content
const fn fixed_height(kind: CellKind) -> Option<f32> {
    let height = match kind {
        CellKind::Placeholder => 0.0,
        CellKind::StreamHeader => 70.0,
        CellKind::Footer => 44.0,
        CellKind::CreateComment => 75.0,
        CellKind::CommentHeader => 50.0,
        CellKind::SeeMoreComments | CellKind::TextHeader => 60.0,
        CellKind::Spacer => 25.0,
        CellKind::Loading => 90.0,
        CellKind::NoPosts => 215.0,
        CellKind::ProfileHeader => 320.0,
        CellKind::Badge => 64.0,
        CellKind::UserListItem => 85.0,
        CellKind::UserAvatars => 50.0,
        CellKind::Text(_)
        | CellKind::Image(_)
        | CellKind::Embed(_)
        | CellKind::CommentBody
        | CellKind::Notification
        | CellKind::Editorial => return None,
    };
    Some(height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EditorialKind, Post, shared};
    use std::cell::Cell;

    fn text_item(text: &str) -> CellItem {
        CellItem::new(CellKind::Text(0), shared(Post::new("p1", "u1").with_text(text)))
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>fish &amp; chips</p><p>ok</p>"), "fish & chips\n\nok");
        assert_eq!(strip_html("a<br>b"), "a\nb");
        assert_eq!(strip_html("&lt;b&gt;"), "<b>");
    }

    #[test]
    fn test_longer_text_is_taller() {
        let calculator = TextSizeCalculator::default();
        let short = calculator.text_height("<p>hi</p>", 200.0);
        let long = calculator.text_height(&"word ".repeat(100), 200.0);
        assert!(long > short);
        assert!((short - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_image_keeps_aspect_ratio() {
        let calculator = TextSizeCalculator::default();
        let mut post = Post::new("p1", "u1");
        post.content.push(Region::Image {
            url: "https://example.com/a.png".to_string(),
            width: Some(400),
            height: Some(300),
        });
        let item = CellItem::new(CellKind::Image(0), shared(post));
        let height = tokio_test::block_on(calculator.height(&item, 400.0, 1));
        assert_eq!(height, Some(300.0));
    }

    #[test]
    fn test_columns_narrow_the_text() {
        let calculator = TextSizeCalculator::default();
        let item = text_item(&"word ".repeat(60));
        let one = tokio_test::block_on(calculator.height(&item, 400.0, 1)).unwrap();
        let two = tokio_test::block_on(calculator.height(&item, 400.0, 2)).unwrap();
        assert!(two > one);
    }

    #[test]
    fn test_missing_region_is_unmeasured() {
        let calculator = TextSizeCalculator::default();
        let item = CellItem::new(CellKind::Text(3), shared(Post::new("p1", "u1")));
        assert_eq!(tokio_test::block_on(calculator.height(&item, 400.0, 1)), None);
    }

    struct YieldingCalculator;

    impl SizeCalculator for YieldingCalculator {
        async fn height(&self, _item: &CellItem, _width: f32, _columns: usize) -> Option<f32> {
            tokio::task::yield_now().await;
            Some(42.0)
        }
    }

    #[derive(Default)]
    struct CountingPrefetcher {
        calls: Cell<usize>,
    }

    impl EditorialPrefetcher for CountingPrefetcher {
        async fn prefetch(&self, editorial: &Shared<Editorial>) {
            tokio::task::yield_now().await;
            self.calls.set(self.calls.get() + 1);
            editorial.borrow_mut().image_ready = true;
        }
    }

    #[tokio::test]
    async fn test_batch_waits_for_every_calculation() {
        let editorial = shared(Editorial::new("e1", EditorialKind::External, "Read this"));
        let mut items = vec![
            text_item("<p>one</p>"),
            CellItem::new(CellKind::Editorial, editorial.clone()),
            text_item("<p>three</p>"),
        ];
        let prefetcher = CountingPrefetcher::default();

        calculate_cell_items(&mut items, &YieldingCalculator, &prefetcher, 375.0, 2).await;

        assert!(items.iter().all(|item| item.heights.get(2) == Some(42.0)));
        assert!(items.iter().all(|item| item.heights.get(1).is_none()));
        assert_eq!(prefetcher.calls.get(), 1);
        assert!(editorial.borrow().image_ready);
    }
}

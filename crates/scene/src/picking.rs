use foundation::LayerId;
use foundation::math::Position;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PickedItem {
    Terrain(Position),
    /// A pickable shape drawn by a layer, optionally with a geographic anchor.
    Shape {
        layer: LayerId,
        position: Option<Position>,
    },
}

/// Items under a screen point, nearest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PickList {
    items: Vec<PickedItem>,
}

impl PickList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: PickedItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[PickedItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Position of the terrain item, if the terrain was under the point.
    pub fn terrain_object(&self) -> Option<Position> {
        self.items.iter().find_map(|item| match item {
            PickedItem::Terrain(position) => Some(*position),
            PickedItem::Shape { .. } => None,
        })
    }
}

impl FromIterator<PickedItem> for PickList {
    fn from_iter<I: IntoIterator<Item = PickedItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Snaps every edge to whole pixels. Rects that share an edge before
    /// snapping still share it afterwards.
    pub fn rounded(self) -> Self {
        let (left, top) = (self.x.round(), self.y.round());
        Self {
            x: left,
            y: top,
            width: (self.x + self.width).round() - left,
            height: (self.y + self.height).round() - top,
        }
    }

    /// Half-open: the left and top edges are inside, the right and bottom
    /// edges belong to the neighbour.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

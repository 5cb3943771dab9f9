use crate::{Color, NodeRef, Size};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PositionType {
    #[default]
    Relative,
    Absolute,
}

impl PositionType {
    pub fn as_css(self) -> &'static str {
        match self {
            PositionType::Relative => "relative",
            PositionType::Absolute => "absolute",
        }
    }
}

/// A 3-axis translation, the only transform the style boundary emits.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Translate3d {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Translate3d {
    pub fn xy(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn to_css(self) -> String {
        format!("translate3D({}px, {}px, {})", self.x, self.y, self.z)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Modifier {
    pub size: Option<Size>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub padding: Option<f32>,
    pub background: Option<Color>,
    pub class: Option<String>,
    pub position_type: Option<PositionType>,
    pub transform: Option<Translate3d>,
    pub node_ref: Option<NodeRef>,
}

impl Modifier {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn size(mut self, w: f32, h: f32) -> Self {
        self.size = Some(Size {
            width: w,
            height: h,
        });
        self
    }
    pub fn width(mut self, w: f32) -> Self {
        self.width = Some(w);
        self
    }
    pub fn height(mut self, h: f32) -> Self {
        self.height = Some(h);
        self
    }
    pub fn padding(mut self, v: f32) -> Self {
        self.padding = Some(v);
        self
    }
    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }
    /// Style class name, for hosts that map views onto stylesheet rules.
    pub fn class(mut self, name: impl Into<String>) -> Self {
        self.class = Some(name.into());
        self
    }
    pub fn translate(mut self, x: f32, y: f32) -> Self {
        self.transform = Some(Translate3d::xy(x, y));
        self
    }
    /// Binds `node` to the view carrying this modifier on the next commit.
    pub fn node_ref(mut self, node: &NodeRef) -> Self {
        self.node_ref = Some(node.clone());
        self
    }

    /// Inline style declarations, e.g. for an element's `style` attribute.
    pub fn to_css(&self) -> String {
        let mut decls: Vec<String> = Vec::new();
        if let Some(p) = self.position_type {
            decls.push(format!("position: {}", p.as_css()));
        }
        if let Some(t) = self.transform {
            decls.push(format!("transform: {}", t.to_css()));
        }
        if let Some(w) = self.resolved_width() {
            decls.push(format!("width: {w}px"));
        }
        if let Some(h) = self.resolved_height() {
            decls.push(format!("height: {h}px"));
        }
        if let Some(p) = self.padding {
            decls.push(format!("padding: {p}px"));
        }
        if let Some(c) = self.background {
            decls.push(format!("background: {}", c.to_css()));
        }
        decls.join("; ")
    }

    /// Resolved width: an explicit `width` wins over `size`.
    pub fn resolved_width(&self) -> Option<f32> {
        self.width.or(self.size.map(|s| s.width))
    }

    pub fn resolved_height(&self) -> Option<f32> {
        self.height.or(self.size.map(|s| s.height))
    }
}

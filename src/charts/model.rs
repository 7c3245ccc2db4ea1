use std::f64::consts::TAU;

/// RGB colour usable by both the SVG writer and the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartColor(pub u8, pub u8, pub u8);

impl ChartColor {
    pub const SKY_BLUE: ChartColor = ChartColor(135, 206, 235);
    pub const LIGHT_GREEN: ChartColor = ChartColor(144, 238, 144);
    pub const SALMON: ChartColor = ChartColor(250, 128, 114);
    pub const STEEL_BLUE: ChartColor = ChartColor(70, 130, 180);
    pub const ORANGE: ChartColor = ChartColor(255, 165, 0);
    pub const GREEN: ChartColor = ChartColor(0, 128, 0);

    /// Categorical palette for pie slices
    pub const PALETTE: [ChartColor; 10] = [
        ChartColor(31, 119, 180),
        ChartColor(255, 127, 14),
        ChartColor(44, 160, 44),
        ChartColor(214, 39, 40),
        ChartColor(148, 103, 189),
        ChartColor(140, 86, 75),
        ChartColor(227, 119, 194),
        ChartColor(127, 127, 127),
        ChartColor(188, 189, 34),
        ChartColor(23, 190, 207),
    ];

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    GroupedBar,
    StackedBar,
    Pie,
}

/// One named row of values, aligned with the chart's categories
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub color: ChartColor,
    pub values: Vec<f64>,
}

impl Series {
    pub fn new(name: impl Into<String>, color: ChartColor, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            color,
            values,
        }
    }
}

/// A slice of a pie chart, angles in radians measured counter-clockwise from +x
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieSlice {
    pub index: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    pub fraction: f64,
}

impl PieSlice {
    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    /// File stem used when the chart is written to disk
    pub file_stem: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub kind: ChartKind,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
    /// Per-slice colours for pies; the palette is used past the end
    pub slice_colors: Vec<ChartColor>,
    /// Angle of the first pie slice edge, degrees counter-clockwise from 3 o'clock
    pub start_angle: f64,
}

impl Chart {
    fn new(
        kind: ChartKind,
        title: &str,
        x_label: &str,
        y_label: &str,
        categories: Vec<String>,
        series: Vec<Series>,
    ) -> Self {
        Self {
            file_stem: slugify(title),
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            kind,
            categories,
            series,
            slice_colors: Vec::new(),
            start_angle: 0.0,
        }
    }

    pub fn bar(
        title: &str,
        x_label: &str,
        y_label: &str,
        categories: Vec<String>,
        values: Vec<f64>,
        color: ChartColor,
    ) -> Self {
        let series = vec![Series::new(y_label, color, values)];
        Self::new(ChartKind::Bar, title, x_label, y_label, categories, series)
    }

    pub fn grouped_bar(
        title: &str,
        x_label: &str,
        y_label: &str,
        categories: Vec<String>,
        series: Vec<Series>,
    ) -> Self {
        Self::new(ChartKind::GroupedBar, title, x_label, y_label, categories, series)
    }

    /// Series are stacked bottom to top in the order given
    pub fn stacked_bar(
        title: &str,
        x_label: &str,
        y_label: &str,
        categories: Vec<String>,
        series: Vec<Series>,
    ) -> Self {
        Self::new(ChartKind::StackedBar, title, x_label, y_label, categories, series)
    }

    pub fn pie(title: &str, labels: Vec<String>, values: Vec<f64>) -> Self {
        let series = vec![Series::new(title, ChartColor::PALETTE[0], values)];
        Self::new(ChartKind::Pie, title, "", "", labels, series)
    }

    pub fn named(mut self, file_stem: &str) -> Self {
        self.file_stem = file_stem.to_string();
        self
    }

    pub fn with_colors(mut self, colors: Vec<ChartColor>) -> Self {
        self.slice_colors = colors;
        self
    }

    pub fn with_start_angle(mut self, degrees: f64) -> Self {
        self.start_angle = degrees;
        self
    }

    pub fn slice_color(&self, index: usize) -> ChartColor {
        self.slice_colors
            .get(index)
            .copied()
            .unwrap_or(ChartColor::PALETTE[index % ChartColor::PALETTE.len()])
    }

    fn value(&self, series: usize, category: usize) -> f64 {
        self.series
            .get(series)
            .and_then(|s| s.values.get(category))
            .copied()
            .unwrap_or(0.0)
    }

    /// Height of the tallest bar, or of the tallest stack for stacked charts
    pub fn max_value(&self) -> f64 {
        match self.kind {
            ChartKind::StackedBar => (0..self.categories.len())
                .map(|c| self.stack_top(c, self.series.len()))
                .fold(0.0, f64::max),
            _ => self
                .series
                .iter()
                .flat_map(|s| s.values.iter().copied())
                .fold(0.0, f64::max),
        }
    }

    /// Sum of the first `upto` series for `category`, i.e. the base of series `upto`
    pub fn stack_top(&self, category: usize, upto: usize) -> f64 {
        (0..upto.min(self.series.len()))
            .map(|s| self.value(s, category))
            .sum()
    }

    pub fn pie_total(&self) -> f64 {
        self.series
            .first()
            .map(|s| s.values.iter().filter(|v| **v > 0.0).sum::<f64>())
            .unwrap_or(0.0)
    }

    /// Slices starting at `start_angle` and running counter-clockwise.
    ///
    /// Zero and negative values produce no slice; a zero total produces none.
    pub fn pie_slices(&self) -> Vec<PieSlice> {
        let total = self.pie_total();
        if total <= 0.0 {
            return Vec::new();
        }

        let mut slices = Vec::new();
        let mut angle = self.start_angle.to_radians();
        if let Some(series) = self.series.first() {
            for (index, value) in series.values.iter().enumerate() {
                if *value <= 0.0 {
                    continue;
                }
                let fraction = value / total;
                let end = angle + fraction * TAU;
                slices.push(PieSlice {
                    index,
                    start_angle: angle,
                    end_angle: end,
                    fraction,
                });
                angle = end;
            }
        }
        slices
    }
}

/// Round `max` up to 1, 2 or 5 times a power of ten, for axis ticks
pub fn nice_axis_max(max: f64) -> f64 {
    if max <= 0.0 || !max.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(max.log10().floor());
    let normalized = max / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn slugify(title: &str) -> String {
    let slug: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    let slug = slug
        .split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    if slug.is_empty() {
        "chart".to_string()
    } else {
        slug
    }
}

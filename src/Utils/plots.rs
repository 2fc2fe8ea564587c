//! Multi-panel figure sink with two backends, plotters and gnuplot.
//!
//! A `Figure` is a grid of panels; each panel holds labeled `(x, y)` curves,
//! a title, axis labels, an optional set of x-tick overrides and a grid flag.
//! Panels are addressed by 1-based index, row-major.

use nalgebra::DVector;

pub struct Curve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub label: Option<String>,
}

#[derive(Default)]
pub struct Panel {
    pub curves: Vec<Curve>,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_ticks: Option<Vec<(f64, String)>>,
    pub grid: bool,
}

pub struct Figure {
    rows: usize,
    cols: usize,
    title: String,
    panels: Vec<Panel>,
}

impl Figure {
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut panels = Vec::with_capacity(rows * cols);
        for _ in 0..rows * cols {
            panels.push(Panel::default());
        }
        Figure {
            rows,
            cols,
            title: String::new(),
            panels,
        }
    }

    fn panel_mut(&mut self, index: usize) -> &mut Panel {
        assert!(
            index >= 1 && index <= self.panels.len(),
            "panel index out of range"
        );
        &mut self.panels[index - 1]
    }

    pub fn set_fig_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub fn set_axes_title(&mut self, title: &str, index: usize) {
        self.panel_mut(index).title = title.to_string();
    }

    /// Axis labels applied to every panel.
    pub fn set_x_label(&mut self, label: &str) {
        for panel in &mut self.panels {
            panel.x_label = label.to_string();
        }
    }

    pub fn set_y_label(&mut self, label: &str) {
        for panel in &mut self.panels {
            panel.y_label = label.to_string();
        }
    }

    pub fn set_x_ticks(&mut self, ticks: Vec<(f64, String)>, index: usize) {
        self.panel_mut(index).x_ticks = Some(ticks);
    }

    pub fn grid(&mut self) {
        for panel in &mut self.panels {
            panel.grid = true;
        }
    }

    pub fn add_curve(
        &mut self,
        x: &DVector<f64>,
        y: &DVector<f64>,
        label: Option<&str>,
        index: usize,
    ) {
        self.panel_mut(index).curves.push(Curve {
            x: x.iter().copied().collect(),
            y: y.iter().copied().collect(),
            label: label.map(|s| s.to_string()),
        });
    }

    pub fn add_graph(&mut self, curves: Vec<Curve>, index: usize) {
        self.panel_mut(index).curves.extend(curves);
    }

    /// Renders with the plotters backend.
    pub fn save_png(&self, filename: &str) {
        use plotters::prelude::*;
        let width = 800 * self.cols as u32;
        let height = 600 * self.rows as u32;
        let root_area = BitMapBackend::new(filename, (width, height)).into_drawing_area();
        root_area.fill(&WHITE).unwrap();
        let root_area = if self.title.is_empty() {
            root_area
        } else {
            root_area.titled(&self.title, ("sans-serif", 40)).unwrap()
        };
        let areas = root_area.split_evenly((self.rows, self.cols));

        for (panel, area) in self.panels.iter().zip(areas.iter()) {
            if panel.curves.is_empty() {
                continue;
            }
            let (x_min, x_max, y_min, y_max) = panel_ranges(panel);

            let mut chart = ChartBuilder::on(area)
                .caption(&panel.title, ("sans-serif", 30))
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(50)
                .build_cartesian_2d(x_min..x_max, y_min..y_max)
                .unwrap();

            {
                let ticks = panel.x_ticks.clone();
                let formatter = move |v: &f64| {
                    ticks
                        .as_ref()
                        .and_then(|ticks| {
                            ticks
                                .iter()
                                .min_by(|a, b| {
                                    (a.0 - v).abs().partial_cmp(&(b.0 - v).abs()).unwrap()
                                })
                                .map(|(_, label)| label.clone())
                        })
                        .unwrap_or_else(|| format!("{}", v))
                };
                let mut mesh = chart.configure_mesh();
                mesh.x_desc(&panel.x_label).y_desc(&panel.y_label);
                if !panel.grid {
                    mesh.disable_mesh();
                }
                if let Some(ticks) = &panel.x_ticks {
                    mesh.x_labels(ticks.len());
                }
                mesh.x_label_formatter(&formatter);
                mesh.draw().unwrap();
            }

            for (i, curve) in panel.curves.iter().enumerate() {
                let series: Vec<(f64, f64)> = curve
                    .x
                    .iter()
                    .zip(curve.y.iter())
                    .map(|(&x, &y)| (x, y))
                    .collect();
                let drawn = chart
                    .draw_series(LineSeries::new(series, &Palette99::pick(i)))
                    .unwrap();
                if let Some(label) = &curve.label {
                    drawn.label(label.clone()).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], &Palette99::pick(i))
                    });
                }
            }

            if panel.curves.iter().any(|c| c.label.is_some()) {
                chart
                    .configure_series_labels()
                    .background_style(&WHITE.mix(0.8))
                    .border_style(&BLACK)
                    .draw()
                    .unwrap();
            }
        }
        root_area.present().unwrap();
    }

    /// Renders with the gnuplot backend, laying the panels out as a
    /// multiplot grid.
    pub fn save_png_gnuplot(&self, filename: &str) {
        use gnuplot::{AutoOption, AxesCommon, Caption, Color, RGBString, Tick};
        let mut fg = gnuplot::Figure::new();
        if self.title.is_empty() {
            fg.set_multiplot_layout(self.rows, self.cols);
        } else {
            fg.set_multiplot_layout(self.rows, self.cols)
                .set_title(&self.title);
        }

        for panel in &self.panels {
            if panel.curves.is_empty() {
                continue;
            }
            let axes = fg.axes2d();
            axes.set_title(&panel.title, &[])
                .set_x_label(&panel.x_label, &[])
                .set_y_label(&panel.y_label, &[]);
            if panel.grid {
                axes.set_x_grid(true).set_y_grid(true);
            }
            if let Some(ticks) = &panel.x_ticks {
                let tick_list: Vec<Tick<f64, &str>> = ticks
                    .iter()
                    .map(|(pos, label)| Tick::Major(*pos, AutoOption::Fix(label.as_str())))
                    .collect();
                axes.set_x_ticks_custom(tick_list, &[], &[]);
            }
            for curve in &panel.curves {
                match &curve.label {
                    Some(label) => {
                        axes.lines(
                            &curve.x,
                            &curve.y,
                            &[Caption(label), Color(RGBString("blue"))],
                        );
                    }
                    None => {
                        axes.lines(&curve.x, &curve.y, &[Color(RGBString("blue"))]);
                    }
                }
            }
        }
        fg.save_to_png(filename, 800 * self.cols as u32, 600 * self.rows as u32)
            .unwrap();
    }
}

fn panel_ranges(panel: &Panel) -> (f64, f64, f64, f64) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for curve in &panel.curves {
        for &x in &curve.x {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
        }
        for &y in &curve.y {
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }
    // degenerate ranges make plotters panic, widen them a little
    if x_min == x_max {
        x_max = x_min + 1.0;
    }
    if y_min == y_max {
        y_max = y_min + 1.0;
    }
    let y_pad = (y_max - y_min) * 0.05;
    (x_min, x_max, y_min - y_pad, y_max + y_pad)
}

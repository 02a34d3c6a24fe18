mod interaction;
mod reduce;
mod view;

pub(in crate::app) use reduce::{ReducedGraph, RenderNode, reduce_graph};
pub(in crate::app) use view::{RenderStats, Scene, render_empty, render_scene};

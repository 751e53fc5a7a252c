use fast_image_resize as fr;
use image::{DynamicImage, RgbaImage};
use ratatui::layout::Rect;

use crate::backend::RgbaFrame;
use crate::error::{AppError, AppResult};

use super::terminal_cell::cells_to_px;
use super::traits::PanOffset;

pub(crate) const DOWNSCALE_FILTER: fr::FilterType = fr::FilterType::CatmullRom;

pub(crate) fn frame_to_image(frame: &RgbaFrame) -> AppResult<DynamicImage> {
    let image = RgbaImage::from_raw(frame.width, frame.height, frame.pixels_to_vec()).ok_or(
        AppError::invalid_argument("rgba frame pixels length does not match dimensions"),
    )?;
    Ok(DynamicImage::ImageRgba8(image))
}

/// Shrinks `frame` so it fits `area`; smaller frames come back untouched.
pub(crate) fn downscale_frame_for_area(
    frame: &RgbaFrame,
    area: Rect,
    cell_px: (u16, u16),
) -> AppResult<RgbaFrame> {
    let (max_width, max_height) = cells_to_px(area.width.max(1), area.height.max(1), cell_px);
    let Some((dst_width, dst_height)) =
        fit_downscale_dimensions(frame.width, frame.height, max_width, max_height)
    else {
        return Ok(frame.clone());
    };

    resize_frame_simd(frame, dst_width, dst_height)
}

pub(crate) fn fit_downscale_dimensions(
    src_width: u32,
    src_height: u32,
    max_width: u32,
    max_height: u32,
) -> Option<(u32, u32)> {
    if src_width == 0 || src_height == 0 || max_width == 0 || max_height == 0 {
        return None;
    }
    if src_width <= max_width && src_height <= max_height {
        return None;
    }

    let width_bound = u64::from(max_width) * u64::from(src_height)
        <= u64::from(max_height) * u64::from(src_width);
    if width_bound {
        let height = (u64::from(src_height) * u64::from(max_width) / u64::from(src_width)).max(1);
        Some((max_width, (height as u32).min(max_height)))
    } else {
        let width = (u64::from(src_width) * u64::from(max_height) / u64::from(src_height)).max(1);
        Some(((width as u32).min(max_width), max_height))
    }
}

fn resize_frame_simd(frame: &RgbaFrame, dst_width: u32, dst_height: u32) -> AppResult<RgbaFrame> {
    let src = fr::images::Image::from_vec_u8(
        frame.width,
        frame.height,
        frame.pixels_to_vec(),
        fr::PixelType::U8x4,
    )
    .map_err(|_| {
        AppError::invalid_argument("rgba frame pixels length does not match dimensions")
    })?;

    let mut dst = fr::images::Image::new(dst_width, dst_height, fr::PixelType::U8x4);
    let options =
        fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(DOWNSCALE_FILTER));
    fr::Resizer::new()
        .resize(&src, &mut dst, &options)
        .map_err(|_| AppError::unsupported("failed to downscale frame"))?;

    Ok(RgbaFrame {
        width: dst_width,
        height: dst_height,
        pixels: dst.into_vec().into(),
    })
}

/// Limits `pan` to the part of the page that lies outside `area`.
pub(crate) fn clamp_pan(
    frame_width: u32,
    frame_height: u32,
    area: Rect,
    cell_px: (u16, u16),
    pan: PanOffset,
) -> PanOffset {
    let (view_width, view_height) = cells_to_px(area.width.max(1), area.height.max(1), cell_px);
    let overflow_x = frame_width.saturating_sub(view_width);
    let overflow_y = frame_height.saturating_sub(view_height);
    // round up so the last partial cell of the page stays reachable
    let max_x = overflow_x.div_ceil(u32::from(cell_px.0.max(1)));
    let max_y = overflow_y.div_ceil(u32::from(cell_px.1.max(1)));

    PanOffset {
        cells_x: pan.cells_x.clamp(0, i32::try_from(max_x).unwrap_or(i32::MAX)),
        cells_y: pan.cells_y.clamp(0, i32::try_from(max_y).unwrap_or(i32::MAX)),
    }
}

/// Cuts the window of `frame` visible through `area` at `pan`. `pan` must
/// already be clamped.
pub(crate) fn crop_frame(
    frame: &RgbaFrame,
    area: Rect,
    cell_px: (u16, u16),
    pan: PanOffset,
) -> RgbaFrame {
    let (view_width, view_height) = cells_to_px(area.width.max(1), area.height.max(1), cell_px);
    if frame.width <= view_width && frame.height <= view_height {
        return frame.clone();
    }

    let origin_x = (pan.cells_x.max(0) as u32)
        .saturating_mul(u32::from(cell_px.0))
        .min(frame.width.saturating_sub(view_width));
    let origin_y = (pan.cells_y.max(0) as u32)
        .saturating_mul(u32::from(cell_px.1))
        .min(frame.height.saturating_sub(view_height));
    let out_width = view_width.min(frame.width - origin_x).max(1);
    let out_height = view_height.min(frame.height - origin_y).max(1);

    let src_stride = frame.width as usize * 4;
    let row_bytes = out_width as usize * 4;
    let mut pixels = Vec::with_capacity(row_bytes * out_height as usize);
    for row in 0..out_height as usize {
        let start = (origin_y as usize + row) * src_stride + origin_x as usize * 4;
        pixels.extend_from_slice(&frame.pixels[start..start + row_bytes]);
    }

    RgbaFrame {
        width: out_width,
        height: out_height,
        pixels: pixels.into(),
    }
}

use super::bus::Ppu;
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// DMG grey shades for palette indices 0-3.
const SHADES: [u8; 4] = [0xFF, 0xAA, 0x55, 0x00];

/// Map a 2-bit colour through a DMG palette register.
#[inline]
fn shade(palette: u8, color: u8) -> u8 {
    SHADES[((palette >> (color * 2)) & 0x03) as usize]
}

/// Compose the background layer into an RGBA frame.
///
/// `vram` is indexed from 0x8000. A disabled LCD or background yields a
/// white frame.
pub(crate) fn render_background(ppu: &Ppu, vram: &[u8], frame: &mut [u8]) {
    if !ppu.lcdc.lcd_enable || !ppu.lcdc.bg_enable {
        frame.fill(0xFF);
        return;
    }

    let map_base: usize = if ppu.lcdc.bg_map_high { 0x1C00 } else { 0x1800 };

    for (y, row) in frame
        .chunks_exact_mut(SCREEN_WIDTH * 4)
        .take(SCREEN_HEIGHT)
        .enumerate()
    {
        let bg_y = (y as u8).wrapping_add(ppu.scy);
        for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
            let bg_x = (x as u8).wrapping_add(ppu.scx);
            let map_index = map_base + (bg_y as usize / 8) * 32 + bg_x as usize / 8;
            let tile = vram[map_index];

            // 0x8000 unsigned addressing, or 0x9000-based signed.
            let tile_base = if ppu.lcdc.tile_data_unsigned {
                tile as usize * 16
            } else {
                (0x1000 + (tile as i8 as isize) * 16) as usize
            };
            let row_addr = tile_base + (bg_y as usize & 7) * 2;
            let bit = 7 - (bg_x & 7);
            let lo = (vram[row_addr] >> bit) & 0x01;
            let hi = (vram[row_addr + 1] >> bit) & 0x01;

            let value = shade(ppu.bgp, (hi << 1) | lo);
            pixel.copy_from_slice(&[value, value, value, 0xFF]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::bus::{LcdControl, VRAM_SIZE};

    const FRAME_LEN: usize = SCREEN_WIDTH * SCREEN_HEIGHT * 4;

    #[test]
    fn disabled_background_is_white() {
        let ppu = Ppu::default();
        let mut frame = vec![0u8; FRAME_LEN];
        render_background(&ppu, &vec![0xFF; VRAM_SIZE], &mut frame);
        assert!(frame.iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn tile_pixels_map_through_bgp() {
        let mut ppu = Ppu::default();
        ppu.lcdc = LcdControl::from_byte(0x91);
        ppu.bgp = 0xE4;

        // Tile 0 row 0: colours 3,3,3,3,0,0,0,0 (lo=hi=0xF0).
        let mut vram = vec![0; VRAM_SIZE];
        vram[0] = 0xF0;
        vram[1] = 0xF0;
        let mut frame = vec![0u8; FRAME_LEN];
        render_background(&ppu, &vram, &mut frame);

        assert_eq!(&frame[0..4], &[0x00, 0x00, 0x00, 0xFF]);
        assert_eq!(&frame[16..20], &[0xFF, 0xFF, 0xFF, 0xFF]);
        // Row 1 of the tile is blank.
        let next_row = SCREEN_WIDTH * 4;
        assert_eq!(&frame[next_row..next_row + 4], &[0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn signed_tile_addressing() {
        let mut ppu = Ppu::default();
        ppu.lcdc = LcdControl::from_byte(0x81);
        ppu.bgp = 0xE4;

        // Map entry 0 -> tile 0 at 0x9000 in signed mode.
        let mut vram = vec![0; VRAM_SIZE];
        vram[0x1000] = 0x80;
        let mut frame = vec![0u8; FRAME_LEN];
        render_background(&ppu, &vram, &mut frame);
        assert_eq!(&frame[0..4], &[0xAA, 0xAA, 0xAA, 0xFF]);
    }
}

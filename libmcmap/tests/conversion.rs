use std::fs;

mod common;
use common::{red_blue_image, write_palette, BLUE, RED};
use libmcmap::{
    convert::{image_to_map, map_to_image},
    ConvertOptions, DitherMethod, Error, MapData, Palette,
};
use mktemp::Temp;
use pretty_assertions::assert_eq;
use strum::IntoEnumIterator;

fn palette(dir: &Temp) -> anyhow::Result<Palette> {
    let path = dir.join("colours.csv");
    write_palette(&path)?;
    Ok(Palette::from_file(path)?)
}

#[test]
fn image_becomes_letterboxed_map() -> anyhow::Result<()> {
    let dir = Temp::new_dir()?;
    let palette = palette(&dir)?;
    let input = dir.join("art.png");
    red_blue_image().save(&input)?;

    for method in DitherMethod::iter() {
        let output = dir.join(format!("art_{method}_map"));
        let options = ConvertOptions::builder().dither(method).build();
        let map = image_to_map(&input, &output, &palette, &options)?;

        assert_eq!(fs::read(&output)?.len(), 128 * 128);
        assert_eq!(MapData::from_file(&output, 128, 128)?, map);
        // 64x32 scales to 128x64 and sits in rows 32..96
        assert_eq!(map.get(10, 10), Some(0), "{method}");
        assert_eq!(map.get(10, 64), Some(RED), "{method}");
        assert_eq!(map.get(120, 64), Some(BLUE), "{method}");
        assert_eq!(map.get(120, 100), Some(0), "{method}");
    }
    Ok(())
}

#[test]
fn map_becomes_image_again() -> anyhow::Result<()> {
    let dir = Temp::new_dir()?;
    let palette = palette(&dir)?;
    let input = dir.join("art.png");
    red_blue_image().save(&input)?;
    let map_file = dir.join("art_map");
    let options = ConvertOptions::default();
    image_to_map(&input, &map_file, &palette, &options)?;

    let output = dir.join("art_map.png");
    map_to_image(&map_file, &output, &palette, &options)?;

    let image = image::open(&output)?.to_rgba8();
    assert_eq!(image.dimensions(), (128, 128));
    assert_eq!(image.get_pixel(10, 10).0, [0, 0, 0, 0]);
    assert_eq!(image.get_pixel(10, 64).0, [255, 0, 0, 255]);
    assert_eq!(image.get_pixel(120, 64).0, [0, 0, 255, 255]);
    Ok(())
}

#[test]
fn ordered_dithering_is_deterministic() -> anyhow::Result<()> {
    let dir = Temp::new_dir()?;
    let palette = palette(&dir)?;
    let input = dir.join("gradient.png");
    image::RgbaImage::from_fn(100, 70, |x, y| {
        image::Rgba([(x * 2) as u8, (y * 3) as u8, 128, 255])
    })
    .save(&input)?;

    let options = ConvertOptions::builder()
        .dither(DitherMethod::Ordered)
        .build();
    let first = dir.join("first_map");
    let second = dir.join("second_map");
    image_to_map(&input, &first, &palette, &options)?;
    image_to_map(&input, &second, &palette, &options)?;

    let hash_1 = sha256::try_digest(first.as_path()).unwrap();
    let hash_2 = sha256::try_digest(second.as_path()).unwrap();
    assert_eq!(hash_1, hash_2);
    Ok(())
}

#[test]
fn truncated_map_file_is_padded() -> anyhow::Result<()> {
    let dir = Temp::new_dir()?;
    let palette = palette(&dir)?;
    let map_file = dir.join("short_map");
    fs::write(&map_file, [RED; 100])?;

    let output = dir.join("short.ppm");
    let texture = map_to_image(&map_file, &output, &palette, &ConvertOptions::default())?;
    assert_eq!(texture.get(99, 0).map(|c| c.to_rgba8()), Some([255, 0, 0, 255]));
    assert_eq!(texture.get(100, 0).map(|c| c.to_rgba8()), Some([0, 0, 0, 0]));

    // alpha-less formats drop the channel
    let image = image::open(&output)?.to_rgb8();
    assert_eq!(image.get_pixel(100, 0).0, [0, 0, 0]);
    assert_eq!(image.get_pixel(99, 0).0, [255, 0, 0]);
    Ok(())
}

#[test]
fn failed_conversions_write_nothing() -> anyhow::Result<()> {
    let dir = Temp::new_dir()?;
    let palette = palette(&dir)?;
    let options = ConvertOptions::default();

    let garbage = dir.join("garbage.png");
    fs::write(&garbage, b"definitely not a png")?;
    let output = dir.join("garbage_map");
    assert!(matches!(
        image_to_map(&garbage, &output, &palette, &options),
        Err(Error::Decode { .. })
    ));
    assert!(!output.exists());

    let missing = dir.join("missing.png");
    assert!(image_to_map(&missing, &output, &palette, &options).is_err());
    assert!(!output.exists());

    let map_file = dir.join("art_map");
    MapData::default().to_file(&map_file)?;
    let output = dir.join("art.unknown");
    assert!(matches!(
        map_to_image(&map_file, &output, &palette, &options),
        Err(Error::UnsupportedFormat(_))
    ));
    assert!(!output.exists());

    fs::write(&map_file, [200_u8; 128 * 128])?;
    let output = dir.join("art.png");
    assert!(matches!(
        map_to_image(&map_file, &output, &palette, &options),
        Err(Error::IndexOutOfRange { index: 200, .. })
    ));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn malformed_palette_file_reports_position() -> anyhow::Result<()> {
    let dir = Temp::new_dir()?;
    let path = dir.join("colours.csv");
    fs::write(&path, "\"0,0,0\"\n  \"12,300,4\"\n")?;
    assert!(matches!(
        Palette::from_file(&path),
        Err(Error::MalformedPalette { line: 2, column: 3 })
    ));
    Ok(())
}

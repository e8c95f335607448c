//! Layout check harness.
//!
//! Runs the geometric properties of the channel map against the nominal
//! geometry, prints a report and writes layout images for visual
//! inspection.
//!
//! Usage: cargo run --bin layout_check

use pmt_layout::assembly::{self, PmtMap};
use pmt_layout::geometry::bottom::{self, locate_bottom};
use pmt_layout::geometry::rotation::{THETA_BOTTOM, THETA_TOP, rotate};
use pmt_layout::geometry::top::{self, locate_top};
use pmt_layout::geometry::{ArrayId, GeometryConfig, N_PMTS, Position};
use pmt_layout::render;

use std::path::Path;

const TOL: f64 = 1e-9;

fn main() {
    env_logger::init();

    let output_dir = Path::new("layout_output");
    std::fs::create_dir_all(output_dir).expect("Failed to create layout_output directory");

    println!("=== PMT Layout Check ===\n");

    let map = match PmtMap::nominal() {
        Ok(map) => map,
        Err(e) => {
            println!("Failed to build channel map: {e}");
            std::process::exit(1);
        }
    };

    let mut all_pass = true;

    all_pass &= test_top_locator();
    all_pass &= test_bottom_locator();
    all_pass &= test_out_of_range();
    all_pass &= test_channel_ordering(&map);
    all_pass &= test_distinct_positions(&map);
    all_pass &= test_rotation_round_trip(&map);
    all_pass &= test_render(&map, output_dir);

    println!("\n=== Results ===");
    if all_pass {
        println!("ALL CHECKS PASSED");
    } else {
        println!("SOME CHECKS FAILED - check output above");
        std::process::exit(1);
    }
    println!("\nOutput images in: {}", output_dir.display());
}

fn print_result(name: &str, pass: bool, detail: &str) {
    let status = if pass { "PASS" } else { "FAIL" };
    println!("  [{}] {} - {}", status, name, detail);
}

fn radius_of(n: i64) -> f64 {
    locate_top(n).map(|p| p.radius()).unwrap_or(f64::NAN)
}

// === Checks ===

fn test_top_locator() -> bool {
    println!("Check: Top array locator");

    let centre = locate_top(1).map(|p| p == Position::ORIGIN).unwrap_or(false);
    print_result("centre tube", centre, "generation 1 at origin");

    let ring1 = (radius_of(2) - 7.95).abs() < TOL && (radius_of(7) - 7.95).abs() < TOL;
    print_result(
        "ring 1 radius",
        ring1,
        &format!("r(2)={:.6} r(7)={:.6}", radius_of(2), radius_of(7)),
    );

    let ring2 = (radius_of(8) - 15.9).abs() < TOL;
    print_result("ring 2 radius", ring2, &format!("r(8)={:.6}", radius_of(8)));

    let mut monotonic = true;
    let mut last_ring = 0;
    for n in 1..=127 {
        match top::ring_of(n) {
            Ok((ring, _)) if ring >= last_ring => last_ring = ring,
            _ => monotonic = false,
        }
    }
    print_result("ring monotonic", monotonic, "rings non-decreasing over 1..=127");

    centre && ring1 && ring2 && monotonic
}

fn test_bottom_locator() -> bool {
    println!("\nCheck: Bottom array locator");

    let mut monotonic = true;
    let mut last_row = 0;
    for n in 128..=248 {
        match bottom::row_of(n) {
            Ok((row, _)) if row >= last_row => last_row = row,
            _ => monotonic = false,
        }
    }
    print_result(
        "row monotonic",
        monotonic && last_row == bottom::N_ROWS - 1,
        &format!("last row {last_row}"),
    );

    let finite = (128..=248).all(|n| locate_bottom(n).map(|p| p.is_finite()).unwrap_or(false));
    print_result("finite", finite, "all 121 positions finite");

    monotonic && finite
}

fn test_out_of_range() -> bool {
    println!("\nCheck: Out-of-range inputs");

    let rejected = locate_top(0).is_err()
        && locate_top(128).is_err()
        && locate_bottom(127).is_err()
        && locate_bottom(249).is_err()
        && assembly::pmt_position(248).is_err()
        && assembly::pmt_position(-1).is_err();
    print_result("rejected", rejected, "top 0/128, bottom 127/249, channel -1/248");
    rejected
}

fn test_channel_ordering(map: &PmtMap) -> bool {
    println!("\nCheck: Channel ordering");

    let count = map.channels().len() == N_PMTS;
    print_result("count", count, &format!("{} channels", map.channels().len()));

    let pairs = [
        (0, ArrayId::Top, 127, THETA_TOP),
        (126, ArrayId::Top, 1, THETA_TOP),
        (127, ArrayId::Bottom, 128, THETA_BOTTOM),
        (247, ArrayId::Bottom, 248, THETA_BOTTOM),
    ];
    let mut all_ok = count;
    for (channel, array, generation, theta) in pairs {
        let expected = match array {
            ArrayId::Top => locate_top(generation),
            ArrayId::Bottom => locate_bottom(generation),
        }
        .map(|p| rotate(p, theta));
        let ok = match (map.position(channel), expected) {
            (Ok(a), Ok(b)) => a.approx_eq(&b, TOL),
            _ => false,
        };
        print_result(
            "mapping",
            ok,
            &format!("channel {channel} <- {} generation {generation}", array.name()),
        );
        all_ok &= ok;
    }
    all_ok
}

fn test_distinct_positions(map: &PmtMap) -> bool {
    println!("\nCheck: Distinct positions per array");

    let mut all_ok = true;
    for &array in ArrayId::ALL {
        let infos: Vec<_> = map.channels_in(array).collect();
        let mut min_d = f64::INFINITY;
        for (i, a) in infos.iter().enumerate() {
            for b in &infos[i + 1..] {
                min_d = min_d.min(a.position.distance(&b.position));
            }
        }
        let ok = min_d > TOL;
        print_result(
            array.name(),
            ok,
            &format!("{} tubes, min spacing {min_d:.4} cm", infos.len()),
        );
        all_ok &= ok;
    }
    all_ok
}

fn test_rotation_round_trip(map: &PmtMap) -> bool {
    println!("\nCheck: Rotation round trip");

    let worst = map
        .channels()
        .iter()
        .map(|c| {
            let theta = map.config().theta(c.array);
            rotate(rotate(c.position, -theta), theta).distance(&c.position)
        })
        .fold(0.0, f64::max);
    let ok = worst < TOL;
    print_result("round trip", ok, &format!("worst error {worst:.3e} cm"));
    ok
}

fn test_render(map: &PmtMap, output_dir: &Path) -> bool {
    println!("\nCheck: Layout rendering");

    let mut all_ok = true;
    let unrotated = GeometryConfig {
        theta_top: 0.0,
        theta_bottom: 0.0,
        ..GeometryConfig::default()
    };
    let maps = [
        ("layout", Ok(map.clone())),
        ("layout_unrotated", PmtMap::build(unrotated)),
    ];
    for (name, built) in maps {
        let path = output_dir.join(format!("{name}.png"));
        let result = built
            .and_then(|m| render::render_layout(&m, 600))
            .and_then(|img| render::save_png(&img, &path));
        let ok = result.is_ok();
        let detail = match result {
            Ok(()) => path.display().to_string(),
            Err(e) => e.to_string(),
        };
        print_result(name, ok, &detail);
        all_ok &= ok;
    }
    all_ok
}

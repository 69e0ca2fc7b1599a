use bevy::light::NotShadowCaster;
use bevy::log::{info, warn_once};
use bevy::prelude::*;
use bevy_egui::egui;

use super::entities::{
    ActiveDetail, DecorationCell, Lod, MapLayout, PendingDetail, StreamCtx, StreamStats,
    Streaming, StructureCell,
};
use super::factory::EntityFactory;
use crate::Viewpoint;
use crate::config::KingdomConfig;
use crate::lod::DetailPolicy;

// ── Update: streaming ──────────────────────────────────────────────

/// Moves the streamer to the cell under the viewpoint and runs one budgeted
/// tick of loads and unloads.
pub fn stream_chunks(mut ctx: StreamCtx, viewpoint: Res<Viewpoint>, cfg: Res<KingdomConfig>) {
    let StreamCtx {
        commands,
        streaming,
        index,
        assets,
        layout,
        detail,
        stats,
    } = &mut ctx;
    let Some(assets) = assets.as_deref() else {
        warn_once!("tile assets missing, streaming paused");
        return;
    };

    let hex = layout.0.world_pos_to_hex(viewpoint.focus);
    streaming.0.update_viewpoint(hex);

    let mut factory = EntityFactory::new(commands, assets, &layout.0, detail.policy);
    let report = streaming
        .0
        .tick(&index.0, &mut factory, cfg.streaming.max_ops_per_tick);
    stats.record(report);
}

/// R drops every loaded chunk and rebuilds around the current viewpoint.
pub fn force_reload_on_key(keys: Res<ButtonInput<KeyCode>>, mut ctx: StreamCtx) {
    if !keys.just_pressed(KeyCode::KeyR) {
        return;
    }
    let StreamCtx {
        commands,
        streaming,
        assets,
        layout,
        detail,
        stats,
        ..
    } = &mut ctx;
    let Some(assets) = assets.as_deref() else {
        return;
    };

    let dropped = streaming.0.loaded_count();
    let mut factory = EntityFactory::new(commands, assets, &layout.0, detail.policy);
    streaming.0.force_reload(&mut factory);
    stats.reloads += 1;
    info!(
        "forced reload: dropped {dropped} chunks, {} queued",
        streaming.0.pending_loads()
    );
}

// ── Update: level of detail ────────────────────────────────────────

/// Feeds the current zoom to the LOD controller.
pub fn update_detail_level(time: Res<Time>, viewpoint: Res<Viewpoint>, mut lod: ResMut<Lod>) {
    lod.0.update(viewpoint.zoom, time.delta_secs());
}

/// Applies a newly reported detail level to decorations and structures.
pub fn apply_detail_policy(
    mut commands: Commands,
    pending: Res<PendingDetail>,
    mut active: ResMut<ActiveDetail>,
    mut decorations: Query<(&DecorationCell, &mut Visibility)>,
    structures: Query<Entity, With<StructureCell>>,
) {
    let Some(level) = pending.take() else { return };
    let policy = DetailPolicy::for_level(level);
    active.level = level;
    active.policy = policy;

    for (decoration, mut visibility) in &mut decorations {
        *visibility = if policy.shows_decoration(decoration.rank) {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
    for entity in &structures {
        if policy.structure_shadows {
            commands.entity(entity).remove::<NotShadowCaster>();
        } else {
            commands.entity(entity).insert(NotShadowCaster);
        }
    }
}

// ── Debug overlay ──────────────────────────────────────────────────

/// Paints streaming and LOD counters in the top-left corner.
pub fn draw_stream_overlay(
    mut egui_ctx: Query<&mut bevy_egui::EguiContext>,
    streaming: Res<Streaming>,
    stats: Res<StreamStats>,
    detail: Res<ActiveDetail>,
    viewpoint: Res<Viewpoint>,
    layout: Res<MapLayout>,
    mut ready: Local<bool>,
) {
    if !*ready {
        *ready = true;
        return;
    }
    let Ok(mut ctx) = egui_ctx.single_mut() else {
        return;
    };

    let streamer = &streaming.0;
    let hex = layout.0.world_pos_to_hex(viewpoint.focus);
    let grid = streamer.chunk_grid();
    let chunk = streamer
        .viewpoint_chunk()
        .map_or_else(|| "-".to_string(), |c| format!("({}, {})", c.x, c.y));
    let last = stats.last;
    let lines = [
        format!("viewpoint ({}, {})  zoom {:.1}", hex.x, hex.y, viewpoint.zoom),
        format!("chunk {chunk} of {}x{}", grid.x, grid.y),
        format!(
            "loaded {} chunks, {} artifacts",
            streamer.loaded_count(),
            streamer.artifact_count()
        ),
        format!(
            "queued +{} -{}{}",
            streamer.pending_loads(),
            streamer.pending_unloads(),
            if streamer.is_settled() { "  settled" } else { "" }
        ),
        format!(
            "last tick +{} -{}  created {} skipped {}",
            last.loaded, last.unloaded, last.artifacts_created, last.skipped
        ),
        format!(
            "totals +{} -{}  skipped {}  reloads {}",
            stats.loads, stats.unloads, stats.skipped, stats.reloads
        ),
        format!(
            "detail {:?}  decorations {:.0}%",
            detail.level,
            detail.policy.decoration_density * 100.0
        ),
    ];

    let painter = ctx.get_mut().layer_painter(egui::LayerId::background());
    for (i, line) in lines.iter().enumerate() {
        painter.text(
            egui::pos2(12.0, 12.0 + i as f32 * 16.0),
            egui::Align2::LEFT_TOP,
            line,
            egui::FontId::monospace(13.0),
            egui::Color32::WHITE,
        );
    }
}

//! Odometry → [`SharedPose`].
//!
//! Listens on [`Topic::Odometry`] and keeps only the planar part of each
//! sample: position and the yaw extracted from its quaternion. Samples that
//! cannot describe a pose are reported on [`Topic::SystemAlerts`] and
//! otherwise ignored.

use litterbug_middleware::{EventBus, Topic, TopicReceiver};
use litterbug_perception::Quaternion;
use litterbug_types::{Event, EventPayload, LitterError, OdometryData, RobotPose};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::world::SharedPose;

const SOURCE: &str = "litterbug-runtime::pose_feed";

pub struct PoseFeed {
    pose: SharedPose,
    bus: EventBus,
    odometry: TopicReceiver,
}

impl PoseFeed {
    /// Subscribes immediately, so samples published after this returns are
    /// not lost.
    pub fn new(pose: SharedPose, bus: EventBus) -> Self {
        let odometry = bus.subscribe_to(Topic::Odometry);
        Self { pose, bus, odometry }
    }

    /// Convert `sample` and store it as the current pose.
    ///
    /// # Errors
    ///
    /// Returns [`LitterError::InvalidPose`] for non-finite values or a
    /// zero-length quaternion.
    pub fn apply(&self, sample: &OdometryData) -> Result<RobotPose, LitterError> {
        let pose = to_pose(sample)?;
        self.pose.set(pose);
        Ok(pose)
    }

    /// Consume odometry until `shutdown` turns `true` or the bus closes.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        while !*shutdown.borrow() {
            tokio::select! {
                received = self.odometry.recv() => match received {
                    Ok(Event { payload: EventPayload::Odometry(sample), .. }) => {
                        match self.apply(&sample) {
                            Ok(pose) => debug!(x = pose.location.x, y = pose.location.y, yaw = pose.heading_rad, "pose updated"),
                            Err(e) => self.report(e),
                        }
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(n)) => warn!(lagged_by = n, "pose feed lagged; using newer samples"),
                    Err(RecvError::Closed) => break,
                },
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
    }

    fn report(&self, error: LitterError) {
        warn!(error = %error, "odometry sample rejected");
        let alert = Event::new(
            SOURCE,
            EventPayload::ScanFault {
                component: "pose_feed".to_string(),
                message: error.to_string(),
            },
        );
        self.bus.publish_to(Topic::SystemAlerts, alert);
    }
}

fn to_pose(sample: &OdometryData) -> Result<RobotPose, LitterError> {
    let OdometryData { x, y, qx, qy, qz, qw } = *sample;
    if ![x, y, qx, qy, qz, qw].iter().all(|v| v.is_finite()) {
        return Err(LitterError::InvalidPose(format!("non-finite value in {sample:?}")));
    }

    let q = Quaternion::new(qw, qx, qy, qz);
    if q.norm() < 1e-9 {
        return Err(LitterError::InvalidPose("zero-length orientation quaternion".to_string()));
    }

    Ok(RobotPose::new(x, y, q.yaw()))
}
